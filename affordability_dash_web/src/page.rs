use std::cell::Cell;
use std::rc::Rc;

use affordability_dash::{ControlId, DashError, DisplayId, FrameTask, Page};
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlOptionElement, HtmlSelectElement, Node, Window};

use crate::vega::js_error_text;

pub const CONFIG_ELEMENT_ID: &str = "dashboard-config";

/// The host HTML page.
#[derive(Clone, Debug)]
pub struct WebPage {
    window: Window,
    document: Document,
}

impl WebPage {
    pub fn new(window: Window, document: Document) -> Self {
        Self { window, document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn select(&self, control: ControlId) -> Option<HtmlSelectElement> {
        self.document
            .get_element_by_id(control.element_id())?
            .dyn_into::<HtmlSelectElement>()
            .ok()
    }

    /// Custom property on `:root`, if the stylesheet defines it.
    pub fn css_var(&self, name: &str) -> Option<String> {
        let root = self.document.document_element()?;
        let styles = self.window.get_computed_style(&root).ok()??;
        styles.get_property_value(name).ok()
    }

    /// Text of the inline JSON config block, if present.
    pub fn config_text(&self) -> Option<String> {
        self.document
            .get_element_by_id(CONFIG_ELEMENT_ID)?
            .text_content()
    }

    fn legend_nodes(&self, selector: &str) -> Result<Vec<Node>, DashError> {
        let list = self
            .document
            .query_selector_all(selector)
            .map_err(|err| DashError::Page(js_error_text(&err)))?;
        Ok((0..list.length()).filter_map(|i| list.item(i)).collect())
    }
}

impl Page for WebPage {
    fn control_value(&self, control: ControlId) -> Option<String> {
        self.select(control).map(|select| select.value())
    }

    fn set_control_value(&self, control: ControlId, value: &str) {
        if let Some(select) = self.select(control) {
            select.set_value(value);
        }
    }

    fn control_options(&self, control: ControlId) -> Vec<(String, String)> {
        let Some(select) = self.select(control) else {
            return Vec::new();
        };
        let options = select.options();
        (0..options.length())
            .filter_map(|i| options.item(i))
            .filter_map(|el: Element| el.dyn_into::<HtmlOptionElement>().ok())
            .map(|option| (option.value(), option.text()))
            .collect()
    }

    fn set_display_text(&self, display: DisplayId, text: &str) {
        if let Some(el) = self.document.get_element_by_id(display.element_id()) {
            el.set_text_content(Some(text));
        }
    }

    fn legend_labels(&self, selector: &str) -> Result<Vec<String>, DashError> {
        Ok(self
            .legend_nodes(selector)?
            .iter()
            .map(|node| node.text_content().unwrap_or_default())
            .collect())
    }

    fn set_legend_label(&self, selector: &str, index: usize, text: &str) -> Result<(), DashError> {
        let nodes = self.legend_nodes(selector)?;
        let node = nodes
            .get(index)
            .ok_or_else(|| DashError::Page(format!("legend entry {index} vanished")))?;
        node.set_text_content(Some(text));
        Ok(())
    }

    fn on_next_frame(&self, task: FrameTask<Self>) {
        let slot = Rc::new(Cell::new(Some(task)));
        let pending = Rc::clone(&slot);
        let page = self.clone();
        let callback = Closure::once_into_js(move || {
            if let Some(task) = pending.take() {
                task(&page);
            }
        });
        if let Err(err) = self.window.request_animation_frame(callback.unchecked_ref()) {
            warn!(error = %js_error_text(&err), "requestAnimationFrame failed; running frame task now");
            if let Some(task) = slot.take() {
                task(self);
            }
        }
    }
}
