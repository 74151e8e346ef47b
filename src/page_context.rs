use std::fmt;

use crate::{Error, Result};

/// Logical identity of the loaded page, derived from its location path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageContext {
    Home,
    DemoSelection,
    Completed,
    Other,
}

impl PageContext {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::DemoSelection => "demo_selection",
            Self::Completed => "completed",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct RouteRule {
    pattern: fancy_regex::Regex,
    context: PageContext,
}

impl RouteRule {
    pub fn new(pattern: &str, context: PageContext) -> Result<Self> {
        let pattern =
            fancy_regex::Regex::new(pattern).map_err(|err| Error::InvalidRoutePattern {
                pattern: pattern.to_string(),
                message: err.to_string(),
            })?;
        Ok(Self { pattern, context })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn context(&self) -> PageContext {
        self.context
    }

    fn matches(&self, path: &str) -> bool {
        // Backtracking limit overruns count as a miss.
        self.pattern.is_match(path).unwrap_or(false)
    }
}

/// Ordered path rules; the first match decides the context.
#[derive(Debug, Clone)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn push(&mut self, pattern: &str, context: PageContext) -> Result<()> {
        self.rules.push(RouteRule::new(pattern, context)?);
        Ok(())
    }

    pub fn with_rule(mut self, pattern: &str, context: PageContext) -> Result<Self> {
        self.push(pattern, context)?;
        Ok(self)
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    pub fn resolve(&self, path: &str) -> PageContext {
        self.rules
            .iter()
            .find(|rule| rule.matches(path))
            .map(RouteRule::context)
            .unwrap_or(PageContext::Other)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        let rules = [
            ("completed", PageContext::Completed),
            ("^/$", PageContext::Home),
            ("demo_selection", PageContext::DemoSelection),
        ];
        let mut table = Self::empty();
        for (pattern, context) in rules {
            let rule = RouteRule::new(pattern, context).expect("built-in route patterns compile");
            table.rules.push(rule);
        }
        table
    }
}
