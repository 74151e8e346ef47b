use crate::controller::{PageState, WiredHandler};
use crate::form::SyntheticForm;
use crate::Result;

/// The slice of a document the controller needs.
///
/// Lookups are total: a missing element is `None`, never a panic. Effects
/// that leave the page (`navigate`, `submit_form`) are fire-and-forget.
pub trait PageDom {
    type Element: Clone;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    fn first_element_by_class(&self, class_name: &str) -> Option<Self::Element>;

    /// Live value of an input-like element.
    fn element_value(&self, element: &Self::Element) -> Result<String>;

    fn set_display(&mut self, element: &Self::Element, display: &str) -> Result<()>;

    fn listen_click(&mut self, element: &Self::Element, handler: WiredHandler) -> Result<()>;

    /// Builds the transient form with its hidden inputs, attaches it to the
    /// body and submits it.
    fn submit_form(&mut self, form: &SyntheticForm) -> Result<()>;

    fn navigate(&mut self, url: &str) -> Result<()>;

    /// Called when the page moves through its lifecycle.
    fn transition(&mut self, _state: &PageState) {}

    fn trace(&mut self, _line: String) {}
}

/// Default-action state of a single click dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickEvent {
    default_prevented: bool,
}

impl ClickEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}
