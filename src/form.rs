use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMethod {
    Get,
    #[default]
    Post,
}

impl FormMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
        }
    }
}

impl fmt::Display for FormMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field name to value mapping carried by a synthetic form.
///
/// Names are unique; inserting an existing name replaces its value in place.
/// Iteration follows first insertion, which keeps encoded bodies stable even
/// though the server reads fields by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormParameters {
    entries: Vec<(String, String)>,
}

impl FormParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(key, _)| *key == name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// `application/x-www-form-urlencoded` serialization.
    pub fn encode(&self) -> String {
        self.entries
            .iter()
            .map(|(name, value)| {
                format!(
                    "{}={}",
                    encode_form_urlencoded_component(name),
                    encode_form_urlencoded_component(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K, V> FromIterator<(K, V)> for FormParameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

/// A transient form: one hidden input per parameter, submitted once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticForm {
    pub action: String,
    pub method: FormMethod,
    pub params: FormParameters,
}

impl SyntheticForm {
    pub fn post(action: impl Into<String>, params: FormParameters) -> Self {
        Self::new(action, params, FormMethod::default())
    }

    pub fn new(action: impl Into<String>, params: FormParameters, method: FormMethod) -> Self {
        Self {
            action: action.into(),
            method,
            params,
        }
    }

    /// Request body as the browser would send it. GET forms have none.
    pub fn body(&self) -> Option<String> {
        match self.method {
            FormMethod::Post => Some(self.params.encode()),
            FormMethod::Get => None,
        }
    }

    /// Target URL. GET forms replace any query and fragment of the action
    /// with their encoded fields.
    pub fn request_url(&self) -> String {
        match self.method {
            FormMethod::Post => self.action.clone(),
            FormMethod::Get => {
                let base = self.action.split(['?', '#']).next().unwrap_or_default();
                format!("{base}?{}", self.params.encode())
            }
        }
    }
}

pub(crate) fn encode_form_urlencoded_component(src: &str) -> String {
    let mut out = String::new();
    for b in src.as_bytes() {
        if is_form_urlencoded_unescaped_byte(*b) {
            out.push(*b as char);
        } else if *b == b' ' {
            out.push('+');
        } else {
            out.push('%');
            out.push(to_hex_upper((*b >> 4) & 0x0F));
            out.push(to_hex_upper(*b & 0x0F));
        }
    }
    out
}

fn is_form_urlencoded_unescaped_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'*' | b'-' | b'.' | b'_')
}

fn to_hex_upper(nibble: u8) -> char {
    match nibble {
        0..=9 => (b'0' + nibble) as char,
        10..=15 => (b'A' + (nibble - 10)) as char,
        _ => '?',
    }
}
