//! `vegaEmbed` and Vega `View` bindings.
//!
//! Both are looked up on the global object at runtime, the same way the
//! page loads them: as plain `<script>` tags.

use affordability_dash::{ChartView, DashError, EmbedOptions, Renderer, SignalValue};
use js_sys::{Array, Function, Object, Promise, Reflect};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

/// Best-effort text for a thrown JS value.
pub fn js_error_text(err: &JsValue) -> String {
    if let Some(text) = err.as_string() {
        return text;
    }
    Reflect::get(err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{err:?}"))
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    // plain objects rather than `Map`s, which vega cannot read
    value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
}

fn method(target: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .and_then(|f| f.dyn_into::<Function>().ok())
}

async fn await_promise(value: JsValue) -> Result<JsValue, JsValue> {
    let promise = value.dyn_into::<Promise>()?;
    JsFuture::from(promise).await
}

pub struct VegaRenderer {
    embed: Function,
}

impl VegaRenderer {
    pub fn from_global() -> Result<Self, DashError> {
        method(&js_sys::global(), "vegaEmbed")
            .map(|embed| Self { embed })
            .ok_or_else(|| DashError::Embed {
                selector: "*".to_string(),
                reason: "vegaEmbed is not loaded".to_string(),
            })
    }
}

impl Renderer for VegaRenderer {
    type View = VegaView;

    async fn embed(
        &self,
        selector: &str,
        spec: Value,
        options: &EmbedOptions,
    ) -> Result<VegaView, DashError> {
        let fail = |reason: String| DashError::Embed {
            selector: selector.to_string(),
            reason,
        };
        let spec_js = to_js(&spec).map_err(|err| fail(err.to_string()))?;
        let options_js = to_js(options).map_err(|err| fail(err.to_string()))?;
        let pending = self
            .embed
            .call3(
                &JsValue::NULL,
                &JsValue::from_str(selector),
                &spec_js,
                &options_js,
            )
            .map_err(|err| fail(js_error_text(&err)))?;
        let result = await_promise(pending)
            .await
            .map_err(|err| fail(js_error_text(&err)))?;
        let view = Reflect::get(&result, &JsValue::from_str("view"))
            .map_err(|err| fail(js_error_text(&err)))?;
        if view.is_undefined() || view.is_null() {
            return Err(fail("embed result has no view".to_string()));
        }
        Ok(VegaView { inner: view })
    }
}

#[derive(Clone, Debug)]
pub struct VegaView {
    inner: JsValue,
}

impl VegaView {
    fn call(&self, name: &str, args: &[&JsValue]) -> Result<JsValue, DashError> {
        let func = method(&self.inner, name)
            .ok_or_else(|| DashError::Update(format!("view.{name} is not a function")))?;
        let result = match args {
            [] => func.call0(&self.inner),
            [a] => func.call1(&self.inner, a),
            [a, b] => func.call2(&self.inner, a, b),
            _ => {
                let list: Array = args.iter().copied().collect();
                func.apply(&self.inner, &list)
            }
        };
        result.map_err(|err| DashError::Update(js_error_text(&err)))
    }
}

fn signal_from_js(value: &JsValue) -> SignalValue {
    if value.is_null() || value.is_undefined() {
        SignalValue::Null
    } else if let Some(b) = value.as_bool() {
        SignalValue::Bool(b)
    } else if let Some(n) = value.as_f64() {
        SignalValue::Number(n)
    } else if let Some(s) = value.as_string() {
        SignalValue::Text(s)
    } else {
        SignalValue::Opaque
    }
}

fn signal_to_js(value: &SignalValue) -> Option<JsValue> {
    match value {
        SignalValue::Null => Some(JsValue::NULL),
        SignalValue::Bool(b) => Some(JsValue::from_bool(*b)),
        SignalValue::Number(n) => Some(JsValue::from_f64(*n)),
        SignalValue::Text(s) => Some(JsValue::from_str(s)),
        SignalValue::Opaque => None,
    }
}

impl ChartView for VegaView {
    fn signal(&self, name: &str) -> Result<SignalValue, DashError> {
        // vega throws for unknown signal names
        self.call("signal", &[&JsValue::from_str(name)])
            .map(|value| signal_from_js(&value))
            .map_err(|_| DashError::MissingSignal(name.to_string()))
    }

    fn set_signal(&self, name: &str, value: &SignalValue) -> Result<(), DashError> {
        let value = signal_to_js(value)
            .ok_or_else(|| DashError::Update(format!("cannot assign opaque value to {name}")))?;
        self.call("signal", &[&JsValue::from_str(name), &value])
            .map(|_| ())
    }

    async fn run(&self) -> Result<(), DashError> {
        let pending = self.call("runAsync", &[])?;
        await_promise(pending)
            .await
            .map(|_| ())
            .map_err(|err| DashError::Update(js_error_text(&err)))
    }

    async fn settled(&self) -> Result<(), DashError> {
        let run_after = method(&self.inner, "runAfter")
            .ok_or_else(|| DashError::Update("view.runAfter is not a function".to_string()))?;
        let view = self.inner.clone();
        let mut scheduled = Ok(JsValue::UNDEFINED);
        let promise = Promise::new(&mut |resolve, _reject| {
            scheduled = run_after.call1(&view, &resolve);
        });
        scheduled.map_err(|err| DashError::Update(js_error_text(&err)))?;
        JsFuture::from(promise)
            .await
            .map(|_| ())
            .map_err(|err| DashError::Update(js_error_text(&err)))
    }

    fn datasets(&self) -> Result<Vec<(String, Value)>, DashError> {
        let options = Object::new();
        let include_all = Function::new_no_args("return true;");
        Reflect::set(&options, &JsValue::from_str("data"), &include_all)
            .map_err(|err| DashError::Update(js_error_text(&err)))?;
        let state = self.call("getState", &[&options])?;
        let data = Reflect::get(&state, &JsValue::from_str("data"))
            .map_err(|err| DashError::Update(js_error_text(&err)))?;
        let Ok(data) = data.dyn_into::<Object>() else {
            return Ok(Vec::new());
        };

        let mut out = Vec::new();
        for entry in Object::entries(&data).iter() {
            let pair = Array::from(&entry);
            let Some(name) = pair.get(0).as_string() else {
                continue;
            };
            match serde_wasm_bindgen::from_value::<Value>(pair.get(1)) {
                Ok(rows) => out.push((name, rows)),
                Err(err) => debug!(dataset = %name, %err, "dataset not representable as JSON"),
            }
        }
        Ok(out)
    }
}
