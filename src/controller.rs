use std::cell::RefCell;
use std::rc::Rc;

use crate::config::ControllerConfig;
use crate::dom::{ClickEvent, PageDom};
use crate::form::{FormMethod, FormParameters, SyntheticForm};
use crate::page_context::PageContext;
use crate::{Error, Result};

pub(crate) const METRIC_FIELD: &str = "metric";
pub(crate) const VIZ_TYPE_FIELD: &str = "viz_type";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickAction {
    /// Reveal the indicator, then POST the current metric.
    SubmitMetric { destination: String },
    /// Suppress the native submission, reveal the indicator, then POST the
    /// current metric and visualization type.
    SubmitSelection { destination: String },
    Navigate { destination: String },
}

impl ClickAction {
    pub fn destination(&self) -> &str {
        match self {
            Self::SubmitMetric { destination }
            | Self::SubmitSelection { destination }
            | Self::Navigate { destination } => destination,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handler {
    pub element_id: String,
    pub action: ClickAction,
}

impl Handler {
    fn new(element_id: &str, action: ClickAction) -> Self {
        Self {
            element_id: element_id.to_string(),
            action,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Navigated(String),
    FormSubmitted(SyntheticForm),
}

/// Per page load: `Unbound -> Bound(context) -> Navigated | FormSubmitted`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageState {
    #[default]
    Unbound,
    Bound(PageContext),
    Navigated(String),
    FormSubmitted(SyntheticForm),
}

impl PageState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Navigated(_) | Self::FormSubmitted(_))
    }
}

impl From<ClickOutcome> for PageState {
    fn from(outcome: ClickOutcome) -> Self {
        match outcome {
            ClickOutcome::Navigated(url) => Self::Navigated(url),
            ClickOutcome::FormSubmitted(form) => Self::FormSubmitted(form),
        }
    }
}

/// A handler as attached to the page, carrying the lookups it performs at
/// click time. Every handler of one page shares the controller's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WiredHandler {
    pub handler: Handler,
    pub indicator_class: String,
    pub metric_id: String,
    pub visualize_id: String,
    pub(crate) state: Rc<RefCell<PageState>>,
}

impl WiredHandler {
    pub fn element_id(&self) -> &str {
        &self.handler.element_id
    }

    pub fn action(&self) -> &ClickAction {
        &self.handler.action
    }

    /// Runs the action. Returns `None` once the page has already navigated
    /// or submitted, since nothing may happen after unload.
    pub fn run<D: PageDom>(
        &self,
        dom: &mut D,
        event: &mut ClickEvent,
    ) -> Result<Option<ClickOutcome>> {
        if self.state.borrow().is_terminal() {
            // The native submit would replace the pending POST.
            if matches!(self.handler.action, ClickAction::SubmitSelection { .. }) {
                event.prevent_default();
            }
            dom.trace(format!(
                "[click] #{} ignored: page unloaded",
                self.handler.element_id
            ));
            return Ok(None);
        }
        dom.trace(format!(
            "[click] #{} action={:?}",
            self.handler.element_id, self.handler.action
        ));
        match self.run_action(dom, event) {
            Ok(outcome) => {
                let next = PageState::from(outcome.clone());
                dom.transition(&next);
                *self.state.borrow_mut() = next;
                Ok(Some(outcome))
            }
            Err(err) => {
                dom.trace(format!(
                    "[lookup] #{} aborted: {err}",
                    self.handler.element_id
                ));
                Err(err)
            }
        }
    }

    fn run_action<D: PageDom>(&self, dom: &mut D, event: &mut ClickEvent) -> Result<ClickOutcome> {
        match &self.handler.action {
            ClickAction::Navigate { destination } => {
                dom.trace(format!("[nav] assign {destination}"));
                dom.navigate(destination)?;
                Ok(ClickOutcome::Navigated(destination.clone()))
            }
            ClickAction::SubmitMetric { destination } => {
                let indicator = find_by_class(dom, &self.indicator_class)?;
                let metric = find_by_id(dom, &self.metric_id)?;
                dom.set_display(&indicator, "block")?;
                let params = FormParameters::new().with(METRIC_FIELD, dom.element_value(&metric)?);
                let form = submit_form(dom, destination, params, FormMethod::Post)?;
                Ok(ClickOutcome::FormSubmitted(form))
            }
            ClickAction::SubmitSelection { destination } => {
                event.prevent_default();
                let indicator = find_by_class(dom, &self.indicator_class)?;
                let metric = find_by_id(dom, &self.metric_id)?;
                let visualize = find_by_id(dom, &self.visualize_id)?;
                dom.set_display(&indicator, "block")?;
                let params = FormParameters::new()
                    .with(METRIC_FIELD, dom.element_value(&metric)?)
                    .with(VIZ_TYPE_FIELD, dom.element_value(&visualize)?);
                let form = submit_form(dom, destination, params, FormMethod::Post)?;
                Ok(ClickOutcome::FormSubmitted(form))
            }
        }
    }
}

/// Shows the first element carrying `class_name`.
pub fn reveal_indicator<D: PageDom>(dom: &mut D, class_name: &str) -> Result<()> {
    let element = find_by_class(dom, class_name)?;
    dom.set_display(&element, "block")
}

/// Submits a transient form to `destination`; the page unloads afterwards.
pub fn submit_form<D: PageDom>(
    dom: &mut D,
    destination: &str,
    params: FormParameters,
    method: FormMethod,
) -> Result<SyntheticForm> {
    let form = SyntheticForm::new(destination, params, method);
    dom.trace(format!(
        "[submit] {} {} fields={}",
        form.method,
        form.action,
        form.params.len()
    ));
    dom.submit_form(&form)?;
    Ok(form)
}

fn find_by_id<D: PageDom>(dom: &D, id: &str) -> Result<D::Element> {
    dom.element_by_id(id).ok_or_else(|| Error::missing_id(id))
}

fn find_by_class<D: PageDom>(dom: &D, class_name: &str) -> Result<D::Element> {
    dom.first_element_by_class(class_name)
        .ok_or_else(|| Error::missing_class(class_name))
}

#[derive(Debug)]
pub struct PageController {
    config: ControllerConfig,
    state: Rc<RefCell<PageState>>,
}

impl PageController {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            state: Rc::new(RefCell::new(PageState::Unbound)),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Current lifecycle state, including transitions made by click handlers.
    pub fn state(&self) -> PageState {
        self.state.borrow().clone()
    }

    pub fn determine_context(&self, path: &str) -> PageContext {
        self.config.routes.resolve(path)
    }

    /// Handlers installed for `context`, in binding order.
    pub fn handlers_for(&self, context: PageContext) -> Vec<Handler> {
        let ids = &self.config.element_ids;
        let dest = &self.config.destinations;
        match context {
            PageContext::Completed => vec![
                Handler::new(
                    &ids.btn_table,
                    ClickAction::SubmitMetric {
                        destination: dest.display_association_rules.clone(),
                    },
                ),
                Handler::new(
                    &ids.btn_heatmap,
                    ClickAction::SubmitMetric {
                        destination: dest.plot_heatmap.clone(),
                    },
                ),
                Handler::new(
                    &ids.btn_graph,
                    ClickAction::SubmitMetric {
                        destination: dest.plot_network_graph.clone(),
                    },
                ),
            ],
            PageContext::Home => vec![Handler::new(
                &ids.btn_demo,
                ClickAction::Navigate {
                    destination: dest.demo_page.clone(),
                },
            )],
            PageContext::DemoSelection => vec![Handler::new(
                &ids.selection,
                ClickAction::SubmitSelection {
                    destination: dest.view_demo.clone(),
                },
            )],
            PageContext::Other => Vec::new(),
        }
    }

    fn wired(&self, handler: Handler) -> WiredHandler {
        WiredHandler {
            handler,
            indicator_class: self.config.indicator_class.clone(),
            metric_id: self.config.element_ids.metric.clone(),
            visualize_id: self.config.element_ids.visualize.clone(),
            state: Rc::clone(&self.state),
        }
    }

    /// Binds the handlers for the page at `path`. Every element is resolved
    /// before any is bound, so a missing element leaves the page unbound.
    /// Once binding starts the controller counts as bound, even if the
    /// backend fails partway, so a retry cannot attach handlers twice.
    pub fn wire<D: PageDom>(&mut self, dom: &mut D, path: &str) -> Result<PageContext> {
        if *self.state.borrow() != PageState::Unbound {
            return Err(Error::AlreadyWired);
        }
        let context = self.determine_context(path);
        dom.trace(format!("[wire] path={path} context={context}"));

        let mut resolved = Vec::new();
        for handler in self.handlers_for(context) {
            let Some(element) = dom.element_by_id(&handler.element_id) else {
                dom.trace(format!(
                    "[lookup] missing #{} for {context}",
                    handler.element_id
                ));
                return Err(Error::missing_id(&handler.element_id));
            };
            resolved.push((element, handler));
        }

        let bound = PageState::Bound(context);
        *self.state.borrow_mut() = bound.clone();
        dom.transition(&bound);
        for (element, handler) in resolved {
            dom.trace(format!("[wire] bind #{}", handler.element_id));
            let wired = self.wired(handler);
            dom.listen_click(&element, wired)?;
        }
        Ok(context)
    }
}
