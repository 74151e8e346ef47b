use crate::page_context::RouteTable;
use crate::{Error, Result};

/// Destination paths embedded by the hosting page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destinations {
    pub display_association_rules: String,
    pub plot_heatmap: String,
    pub plot_network_graph: String,
    pub view_demo: String,
    pub demo_page: String,
}

impl Destinations {
    /// Names of the page constants, in the order the page declares them.
    pub const NAMES: [&'static str; 5] = [
        "display_association_rules",
        "plot_heatmap",
        "plot_network_graph",
        "view_demo",
        "demo_page",
    ];

    /// Builds destinations from `(name, path)` pairs. Unknown names are
    /// ignored; later duplicates win.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut slots: [Option<String>; 5] = Default::default();
        for (name, path) in pairs {
            if let Some(index) = Self::NAMES.iter().position(|n| *n == name.as_ref()) {
                slots[index] = Some(path.into());
            }
        }
        let [rules, heatmap, graph, view_demo, demo_page] = slots;
        let take = |slot: Option<String>, index: usize| {
            slot.ok_or_else(|| Error::MissingDestination(Self::NAMES[index].to_string()))
        };
        Ok(Self {
            display_association_rules: take(rules, 0)?,
            plot_heatmap: take(heatmap, 1)?,
            plot_network_graph: take(graph, 2)?,
            view_demo: take(view_demo, 3)?,
            demo_page: take(demo_page, 4)?,
        })
    }
}

/// Identifiers of the elements the controller looks up by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementIds {
    pub btn_table: String,
    pub btn_heatmap: String,
    pub btn_graph: String,
    pub btn_demo: String,
    pub metric: String,
    pub visualize: String,
    pub selection: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            btn_table: "btn_table".into(),
            btn_heatmap: "btn_heatmap".into(),
            btn_graph: "btn_graph".into(),
            btn_demo: "btn_demo".into(),
            metric: "metric".into(),
            visualize: "visualize".into(),
            selection: "selection".into(),
        }
    }
}

impl ElementIds {
    fn validate(&self) -> Result<()> {
        let fields = [
            ("btn_table", &self.btn_table),
            ("btn_heatmap", &self.btn_heatmap),
            ("btn_graph", &self.btn_graph),
            ("btn_demo", &self.btn_demo),
            ("metric", &self.metric),
            ("visualize", &self.visualize),
            ("selection", &self.selection),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(Error::InvalidConfig(format!(
                    "element id for {field} must not be empty"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub(crate) destinations: Destinations,
    pub(crate) element_ids: ElementIds,
    pub(crate) indicator_class: String,
    pub(crate) routes: RouteTable,
}

impl ControllerConfig {
    pub const DEFAULT_INDICATOR_CLASS: &'static str = "loading";
    pub const SPINNER_INDICATOR_CLASS: &'static str = "spinner-grow";

    pub fn new(destinations: Destinations) -> Self {
        Self {
            destinations,
            element_ids: ElementIds::default(),
            indicator_class: Self::DEFAULT_INDICATOR_CLASS.to_string(),
            routes: RouteTable::default(),
        }
    }

    pub fn with_indicator_class(mut self, class_name: &str) -> Result<Self> {
        self.set_indicator_class(class_name)?;
        Ok(self)
    }

    pub fn with_element_ids(mut self, ids: ElementIds) -> Result<Self> {
        self.set_element_ids(ids)?;
        Ok(self)
    }

    pub fn with_routes(mut self, routes: RouteTable) -> Self {
        self.routes = routes;
        self
    }

    pub fn set_indicator_class(&mut self, class_name: &str) -> Result<()> {
        let class_name = class_name.trim();
        if class_name.is_empty() || class_name.contains(char::is_whitespace) {
            return Err(Error::InvalidConfig(format!(
                "indicator class must be a single class name: {class_name:?}"
            )));
        }
        self.indicator_class = class_name.to_string();
        Ok(())
    }

    pub fn set_element_ids(&mut self, ids: ElementIds) -> Result<()> {
        ids.validate()?;
        self.element_ids = ids;
        Ok(())
    }

    pub fn destinations(&self) -> &Destinations {
        &self.destinations
    }

    pub fn element_ids(&self) -> &ElementIds {
        &self.element_ids
    }

    pub fn indicator_class(&self) -> &str {
        &self.indicator_class
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }
}
