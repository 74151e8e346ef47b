//! Browser binding: wires the controller into the live document once the
//! window has loaded.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement, Window,
};

use crate::config::{ControllerConfig, Destinations};
use crate::controller::{PageController, PageState, WiredHandler};
use crate::dom::{ClickEvent, PageDom};
use crate::form::SyntheticForm;
use crate::page_context::PageContext;
use crate::{Error, Result};

/// Optional page global selecting the indicator variant.
const INDICATOR_CLASS_GLOBAL: &str = "indicator_class";

#[derive(Debug, Clone)]
pub struct WebDom {
    window: Window,
    document: Document,
}

impl WebDom {
    pub fn new() -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| Error::Dom("window is unavailable".into()))?;
        let document = window
            .document()
            .ok_or_else(|| Error::Dom("document is unavailable".into()))?;
        Ok(Self { window, document })
    }

    pub fn path(&self) -> Result<String> {
        self.window.location().pathname().map_err(js_error)
    }

    fn global_string(&self, name: &str) -> Option<String> {
        js_sys::Reflect::get(&self.window, &JsValue::from_str(name))
            .ok()
            .and_then(|value| value.as_string())
    }

    /// Reads the destination constants the page template declares as globals.
    pub fn destinations(&self) -> Result<Destinations> {
        Destinations::from_pairs(
            Destinations::NAMES
                .iter()
                .filter_map(|name| self.global_string(name).map(|path| (*name, path))),
        )
    }

    pub fn config(&self) -> Result<ControllerConfig> {
        let config = ControllerConfig::new(self.destinations()?);
        match self.global_string(INDICATOR_CLASS_GLOBAL) {
            Some(class_name) => config.with_indicator_class(&class_name),
            None => Ok(config),
        }
    }

    fn create(&self, tag_name: &str) -> Result<Element> {
        self.document.create_element(tag_name).map_err(js_error)
    }
}

impl PageDom for WebDom {
    type Element = Element;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn first_element_by_class(&self, class_name: &str) -> Option<Element> {
        self.document.get_elements_by_class_name(class_name).item(0)
    }

    fn element_value(&self, element: &Element) -> Result<String> {
        if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            return Ok(input.value());
        }
        if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
            return Ok(select.value());
        }
        if let Some(textarea) = element.dyn_ref::<HtmlTextAreaElement>() {
            return Ok(textarea.value());
        }
        Err(Error::Dom(format!(
            "<{}> does not hold a value",
            element.tag_name().to_ascii_lowercase()
        )))
    }

    fn set_display(&mut self, element: &Element, display: &str) -> Result<()> {
        let element = element
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| Error::Dom("indicator is not an HtmlElement".into()))?;
        element
            .style()
            .set_property("display", display)
            .map_err(js_error)
    }

    fn listen_click(&mut self, element: &Element, handler: WiredHandler) -> Result<()> {
        let dom = self.clone();
        let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let mut dom = dom.clone();
            let mut click = ClickEvent::new();
            let result = handler.run(&mut dom, &mut click);
            if click.default_prevented() {
                event.prevent_default();
            }
            if let Err(err) = result {
                web_sys::console::error_1(&JsValue::from_str(&err.to_string()));
            }
        });
        element
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .map_err(js_error)?;
        // Listeners live as long as the page.
        closure.forget();
        Ok(())
    }

    fn submit_form(&mut self, form: &SyntheticForm) -> Result<()> {
        let node = self
            .create("form")?
            .dyn_into::<HtmlFormElement>()
            .map_err(|_| Error::Dom("form is not an HtmlFormElement".into()))?;
        node.set_method(form.method.as_str());
        node.set_action(&form.action);
        for (name, value) in form.params.iter() {
            let hidden = self
                .create("input")?
                .dyn_into::<HtmlInputElement>()
                .map_err(|_| Error::Dom("input is not an HtmlInputElement".into()))?;
            hidden.set_type("hidden");
            hidden.set_name(name);
            hidden.set_value(value);
            node.append_child(&hidden).map_err(js_error)?;
        }
        let body = self
            .document
            .body()
            .ok_or_else(|| Error::Dom("document body is unavailable".into()))?;
        body.append_child(&node).map_err(js_error)?;
        node.submit().map_err(js_error)
    }

    fn navigate(&mut self, url: &str) -> Result<()> {
        self.window.location().assign(url).map_err(js_error)
    }

    fn transition(&mut self, state: &PageState) {
        self.trace(format!("[state] {state:?}"));
    }

    fn trace(&mut self, line: String) {
        web_sys::console::debug_1(&JsValue::from_str(&line));
    }
}

fn js_error(value: JsValue) -> Error {
    Error::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

/// Reads the page configuration and wires the handlers for the current path.
pub fn install(dom: &mut WebDom) -> Result<PageContext> {
    let mut controller = PageController::new(dom.config()?);
    let path = dom.path()?;
    controller.wire(dom, &path)
}

#[wasm_bindgen(start)]
pub fn start() -> std::result::Result<(), JsValue> {
    let mut dom = WebDom::new().map_err(|err| JsValue::from_str(&err.to_string()))?;
    let window = dom.window.clone();
    let on_load = Closure::once_into_js(move || {
        if let Err(err) = install(&mut dom) {
            web_sys::console::error_1(&JsValue::from_str(&err.to_string()));
        }
    });
    window.add_event_listener_with_callback("load", on_load.unchecked_ref())
}
