//! WASM bindings for running a colony from JavaScript.
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { solveTsp } from 'u-aco';
//!
//! await init();
//! const result = solveTsp(
//!     [{ x: 0, y: 0 }, { x: 0, y: 10 }, { x: 10, y: 10 }, { x: 10, y: 0 }],
//!     { num_ants: 5, num_iterations: 20, seed: 42 },
//! );
//! console.log(result.best_length, result.best_tour.cities);
//! ```

// WASM-bindgen exports don't need #[must_use] - values returned to JS
#![allow(clippy::must_use_candidate)]

use wasm_bindgen::prelude::*;

use crate::config::AcoConfig;
use crate::distance::City;
use crate::runner::AcoRunner;

/// Runs a colony over `cities` (`[{x, y}, ...]`) with `config` (any subset
/// of the [`AcoConfig`] fields; missing fields take their defaults).
///
/// Returns the serialized [`AcoResult`](crate::AcoResult). Errors are
/// thrown as strings.
#[wasm_bindgen(js_name = solveTsp)]
pub fn solve_tsp(cities: JsValue, config: JsValue) -> Result<JsValue, JsValue> {
    let cities: Vec<City> = serde_wasm_bindgen::from_value(cities)?;
    let config: AcoConfig = if config.is_undefined() || config.is_null() {
        AcoConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)?
    };

    let result =
        AcoRunner::run(&cities, &config).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(serde_wasm_bindgen::to_value(&result)?)
}
