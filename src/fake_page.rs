use std::collections::HashMap;

use crate::controller::{PageController, PageState, WiredHandler};
use crate::dom::{ClickEvent, PageDom};
use crate::form::{FormMethod, FormParameters, SyntheticForm};
use crate::page_context::PageContext;
use crate::trace::TraceState;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    element: Element,
}

#[derive(Debug, Clone)]
struct Element {
    tag_name: String,
    attrs: HashMap<String, String>,
    value: String,
    display: Option<String>,
}

impl Element {
    fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            attrs: HashMap::new(),
            value: String::new(),
            display: None,
        }
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    fn has_class(&self, class_name: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class_name))
    }

    fn is_value_control(&self) -> bool {
        matches!(self.tag_name.as_str(), "input" | "select" | "textarea")
    }

    fn is_submit_control(&self) -> bool {
        match self.tag_name.as_str() {
            "button" => self.attr("type").is_none_or(|t| t.eq_ignore_ascii_case("submit")),
            "input" => self
                .attr("type")
                .is_some_and(|t| t.eq_ignore_ascii_case("submit")),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationNavigation {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub method: FormMethod,
    pub action: String,
    pub body: Option<String>,
    /// `false` when the browser submitted a page-authored form natively.
    pub synthetic: bool,
}

/// In-memory page for driving a [`PageController`] without a browser.
///
/// Navigations and form submissions are recorded instead of performed.
/// After the first of them the page counts as unloaded and later clicks are
/// ignored.
#[derive(Debug)]
pub struct FakePage {
    url: String,
    nodes: Vec<Node>,
    body: NodeId,
    id_index: HashMap<String, NodeId>,
    listeners: HashMap<NodeId, Vec<WiredHandler>>,
    state: PageState,
    location_navigations: Vec<LocationNavigation>,
    form_submissions: Vec<FormSubmission>,
    trace_state: TraceState,
}

impl FakePage {
    pub fn new(url: &str) -> Self {
        let body = Node {
            parent: None,
            children: Vec::new(),
            element: Element::new("body"),
        };
        Self {
            url: url.to_string(),
            nodes: vec![body],
            body: NodeId(0),
            id_index: HashMap::new(),
            listeners: HashMap::new(),
            state: PageState::Unbound,
            location_navigations: Vec::new(),
            form_submissions: Vec::new(),
            trace_state: TraceState::default(),
        }
    }

    pub fn with_button(mut self, id: &str) -> Self {
        let button = self.append(self.body, "button");
        self.set_attr(button, "type", "button");
        self.set_attr(button, "id", id);
        self
    }

    pub fn with_input(mut self, id: &str, value: &str) -> Self {
        let input = self.append(self.body, "input");
        self.set_attr(input, "id", id);
        self.nodes[input.0].element.value = value.to_string();
        self
    }

    pub fn with_select(mut self, id: &str, selected: &str) -> Self {
        let select = self.append(self.body, "select");
        self.set_attr(select, "id", id);
        self.nodes[select.0].element.value = selected.to_string();
        self
    }

    /// Adds a hidden element carrying `class_name`.
    pub fn with_indicator(mut self, class_name: &str) -> Self {
        let div = self.append(self.body, "div");
        self.set_attr(div, "class", class_name);
        self.nodes[div.0].element.display = Some("none".to_string());
        self
    }

    pub fn with_form(mut self, id: &str, action: &str, method: FormMethod) -> Self {
        let form = self.append(self.body, "form");
        self.set_attr(form, "id", id);
        self.set_attr(form, "action", action);
        self.set_attr(form, "method", method.as_str());
        self
    }

    /// Adds a named field inside the form `form_id`, or the body if there is
    /// no such form.
    pub fn with_form_field(mut self, form_id: &str, id: &str, name: &str, value: &str) -> Self {
        let parent = self.id_index.get(form_id).copied().unwrap_or(self.body);
        let input = self.append(parent, "input");
        self.set_attr(input, "id", id);
        self.set_attr(input, "name", name);
        self.nodes[input.0].element.value = value.to_string();
        self
    }

    /// Adds a submit control inside the form `form_id`, or the body if there
    /// is no such form.
    pub fn with_submit_control(mut self, form_id: &str, id: &str) -> Self {
        let parent = self.id_index.get(form_id).copied().unwrap_or(self.body);
        let input = self.append(parent, "input");
        self.set_attr(input, "type", "submit");
        self.set_attr(input, "id", id);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Path component of the page URL, as `location.pathname` reports it.
    pub fn path(&self) -> &str {
        location_path(&self.url)
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    /// Wires `controller` against this page's own path.
    pub fn load(&mut self, controller: &mut PageController) -> Result<PageContext> {
        let path = self.path().to_string();
        controller.wire(self, &path)
    }

    pub fn type_text(&mut self, id: &str, text: &str) -> Result<()> {
        let node = self.element_by_id(id).ok_or_else(|| Error::missing_id(id))?;
        if !self.nodes[node.0].element.is_value_control() {
            return Err(Error::Dom(format!("#{id} does not hold a value")));
        }
        self.nodes[node.0].element.value = text.to_string();
        Ok(())
    }

    /// Dispatches a click on `#id`. Handlers on the target run first, then
    /// the click bubbles through its ancestors; the native form submission
    /// follows unless a handler prevented it.
    pub fn click(&mut self, id: &str) -> Result<ClickEvent> {
        let mut event = ClickEvent::new();
        if self.state.is_terminal() {
            self.trace(format!("[click] #{id} ignored: page unloaded"));
            return Ok(event);
        }
        let target = self.element_by_id(id).ok_or_else(|| Error::missing_id(id))?;

        let mut cursor = Some(target);
        while let Some(current) = cursor {
            let handlers = self.listeners.get(&current).cloned().unwrap_or_default();
            for handler in handlers {
                handler.run(self, &mut event)?;
                if self.state.is_terminal() {
                    return Ok(event);
                }
            }
            cursor = self.nodes[current.0].parent;
        }

        if !event.default_prevented() && self.nodes[target.0].element.is_submit_control() {
            if let Some(form) = self.ancestor_form(target) {
                self.submit_native(form);
            }
        }
        Ok(event)
    }

    pub fn is_displayed(&self, class_name: &str) -> Result<bool> {
        let node = self
            .first_element_by_class(class_name)
            .ok_or_else(|| Error::missing_class(class_name))?;
        Ok(self.nodes[node.0].element.display.as_deref() != Some("none"))
    }

    /// Number of elements carrying `class_name` that are not hidden.
    pub fn visible_count(&self, class_name: &str) -> usize {
        self.nodes
            .iter()
            .filter(|node| node.element.has_class(class_name))
            .filter(|node| node.element.display.as_deref() != Some("none"))
            .count()
    }

    /// Ids of elements with at least one click handler, in document order.
    pub fn bound_element_ids(&self) -> Vec<String> {
        let mut bound = self
            .listeners
            .iter()
            .filter(|(_, handlers)| !handlers.is_empty())
            .map(|(node, _)| *node)
            .collect::<Vec<_>>();
        bound.sort_by_key(|node| node.0);
        bound
            .into_iter()
            .filter_map(|node| self.nodes[node.0].element.attr("id").map(str::to_string))
            .collect()
    }

    pub fn listener_count(&self, id: &str) -> usize {
        self.element_by_id(id)
            .and_then(|node| self.listeners.get(&node))
            .map_or(0, Vec::len)
    }

    /// Forms created by synthetic submissions that are still attached.
    pub fn transient_form_count(&self) -> usize {
        self.nodes[self.body.0]
            .children
            .iter()
            .filter(|child| self.nodes[child.0].element.attr("data-synthetic").is_some())
            .count()
    }

    pub fn take_location_navigations(&mut self) -> Vec<LocationNavigation> {
        std::mem::take(&mut self.location_navigations)
    }

    pub fn take_form_submissions(&mut self) -> Vec<FormSubmission> {
        std::mem::take(&mut self.form_submissions)
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace_state.enabled = enabled;
    }

    pub fn set_trace_stderr(&mut self, enabled: bool) {
        self.trace_state.to_stderr = enabled;
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        self.trace_state.set_log_limit(max_entries)
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        self.trace_state.take()
    }

    fn append(&mut self, parent: NodeId, tag_name: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            element: Element::new(tag_name),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if name == "id" {
            // First element with an id wins, as with getElementById.
            self.id_index.entry(value.to_string()).or_insert(node);
        }
        self.nodes[node.0]
            .element
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    fn ancestor_form(&self, node: NodeId) -> Option<NodeId> {
        let mut cursor = self.nodes[node.0].parent;
        while let Some(current) = cursor {
            if self.nodes[current.0].element.tag_name == "form" {
                return Some(current);
            }
            cursor = self.nodes[current.0].parent;
        }
        None
    }

    fn form_entries(&self, form: NodeId) -> FormParameters {
        let mut params = FormParameters::new();
        let mut stack = self.nodes[form.0].children.clone();
        stack.reverse();
        while let Some(node) = stack.pop() {
            let element = &self.nodes[node.0].element;
            if element.is_value_control() && !element.is_submit_control() {
                if let Some(name) = element.attr("name").filter(|name| !name.is_empty()) {
                    params.insert(name, element.value.clone());
                }
            }
            stack.extend(self.nodes[node.0].children.iter().rev());
        }
        params
    }

    fn submit_native(&mut self, form: NodeId) {
        let element = &self.nodes[form.0].element;
        let method = match element.attr("method") {
            Some(method) if method.eq_ignore_ascii_case("post") => FormMethod::Post,
            _ => FormMethod::Get,
        };
        let action = element.attr("action").unwrap_or(self.url.as_str()).to_string();
        let submitted = SyntheticForm::new(action, self.form_entries(form), method);
        self.trace(format!(
            "[submit] native {} {}",
            submitted.method, submitted.action
        ));
        self.record_submission(&submitted, false);
        self.state = PageState::FormSubmitted(submitted);
    }

    fn record_submission(&mut self, form: &SyntheticForm, synthetic: bool) {
        self.form_submissions.push(FormSubmission {
            method: form.method,
            action: form.request_url(),
            body: form.body(),
            synthetic,
        });
    }
}

impl PageDom for FakePage {
    type Element = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    fn first_element_by_class(&self, class_name: &str) -> Option<NodeId> {
        let mut stack = vec![self.body];
        while let Some(node) = stack.pop() {
            if self.nodes[node.0].element.has_class(class_name) {
                return Some(node);
            }
            stack.extend(self.nodes[node.0].children.iter().rev());
        }
        None
    }

    fn element_value(&self, element: &NodeId) -> Result<String> {
        let element = &self.nodes[element.0].element;
        if !element.is_value_control() {
            return Err(Error::Dom(format!(
                "<{}> does not hold a value",
                element.tag_name
            )));
        }
        Ok(element.value.clone())
    }

    fn set_display(&mut self, element: &NodeId, display: &str) -> Result<()> {
        self.nodes[element.0].element.display = Some(display.to_string());
        Ok(())
    }

    fn listen_click(&mut self, element: &NodeId, handler: WiredHandler) -> Result<()> {
        self.listeners.entry(*element).or_default().push(handler);
        Ok(())
    }

    fn submit_form(&mut self, form: &SyntheticForm) -> Result<()> {
        let node = self.append(self.body, "form");
        self.set_attr(node, "method", form.method.as_str());
        self.set_attr(node, "action", &form.action);
        self.set_attr(node, "data-synthetic", "");
        for (name, value) in form.params.iter() {
            let hidden = self.append(node, "input");
            self.set_attr(hidden, "type", "hidden");
            self.set_attr(hidden, "name", name);
            self.nodes[hidden.0].element.value = value.to_string();
        }

        // Read the request back from the attached hidden inputs.
        let entries = self.form_entries(node);
        let attached = SyntheticForm::new(form.action.clone(), entries, form.method);
        self.record_submission(&attached, true);
        Ok(())
    }

    fn navigate(&mut self, url: &str) -> Result<()> {
        self.location_navigations.push(LocationNavigation {
            from: self.url.clone(),
            to: url.to_string(),
        });
        Ok(())
    }

    fn transition(&mut self, state: &PageState) {
        self.trace_state.line(format!("[state] {state:?}"));
        self.state = state.clone();
    }

    fn trace(&mut self, line: String) {
        self.trace_state.line(line);
    }
}

fn location_path(url: &str) -> &str {
    let rest = match url.find("://") {
        Some(scheme_end) => {
            let after_scheme = &url[scheme_end + 3..];
            match after_scheme.find(['/', '?', '#']) {
                Some(path_start) => &after_scheme[path_start..],
                None => "",
            }
        }
        None => url,
    };
    let path = rest.split(['?', '#']).next().unwrap_or_default();
    if path.is_empty() { "/" } else { path }
}
