//! Functions callable from templates.

mod args;
mod collections;
mod encoding;
mod math;
mod net;
mod params;
mod system;
mod text;

use std::sync::Arc;

use lithos_gotmpl_core::{
    install_text_template_functions, Error, FunctionRegistry, FunctionRegistryBuilder,
};
use lithos_sprig::install_sprig_functions;
use serde_json::Value;

use crate::store::ParameterStore;

pub type Func = fn(&[Value]) -> Result<Value, Error>;
pub type ParamFunc = fn(&dyn ParameterStore, &[Value]) -> Result<Value, Error>;

/// The confd helper table. Installed after the sprig helpers, so these win
/// on a name clash.
pub const CONFD: &[(&str, Func)] = &[
    ("base", system::base),
    ("split", text::split),
    ("json", encoding::json),
    ("jsonArray", encoding::json_array),
    ("dir", system::dir),
    ("map", collections::create_map),
    ("getenv", system::getenv),
    ("join", text::join),
    ("datetime", system::datetime),
    ("toUpper", text::to_upper),
    ("toLower", text::to_lower),
    ("contains", text::contains),
    ("replace", text::replace),
    ("trimSuffix", text::trim_suffix),
    ("lookupIP", net::lookup_ip),
    ("lookupIPV4", net::lookup_ipv4),
    ("lookupIPV6", net::lookup_ipv6),
    ("lookupSRV", net::lookup_srv),
    ("fileExists", system::file_exists),
    ("base64Encode", encoding::base64_encode),
    ("base64Decode", encoding::base64_decode),
    ("parseBool", math::parse_bool),
    ("reverse", collections::reverse),
    ("sortByLength", collections::sort_by_length),
    ("sortKVByLength", collections::sort_kv_by_length),
    ("add", math::add),
    ("sub", math::sub),
    ("div", math::div),
    ("mod", math::modulo),
    ("mul", math::mul),
    ("seq", math::seq),
    ("atoi", math::atoi),
];

/// Parameter store lookups.
pub const PARAMS: &[(&str, ParamFunc)] = &[
    ("get", params::get),
    ("gets", params::gets),
    ("getv", params::getv),
    ("getvs", params::getvs),
];

#[inline]
pub fn install_confd_functions(builder: &mut FunctionRegistryBuilder) {
    for &(name, func) in CONFD {
        builder.register(name, move |_ctx, args| func(args));
    }
}

/// Registers [`PARAMS`] against `store`.
#[inline]
pub fn install_param_functions(
    builder: &mut FunctionRegistryBuilder,
    store: &Arc<dyn ParameterStore>,
) {
    for &(name, func) in PARAMS {
        let store = Arc::clone(store);
        builder.register(name, move |_ctx, args| func(store.as_ref(), args));
    }
}

/// Go's stock helpers, then sprig, then the confd table, then the parameter
/// functions. Later registrations replace earlier ones of the same name.
pub fn registry(store: &Arc<dyn ParameterStore>) -> FunctionRegistry {
    let mut builder = FunctionRegistryBuilder::new();
    install_text_template_functions(&mut builder);
    install_sprig_functions(&mut builder);
    install_confd_functions(&mut builder);
    install_param_functions(&mut builder, store);
    builder.build()
}
