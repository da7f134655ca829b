//! `get`, `gets`, `getv` and `getvs`.

use lithos_gotmpl_core::Error;
use serde::Serialize;
use serde_json::Value;

use super::args::{self, error};
use crate::store::{Client, ParameterStore, StoreError};

#[inline]
fn to_value<T: Serialize>(name: &str, result: Result<T, StoreError>) -> Result<Value, Error> {
    let found = result.map_err(|err| error(format!("{}: {}", name, err)))?;
    serde_json::to_value(found).map_err(|err| error(format!("{}: {}", name, err)))
}

/// `get KEY`, a key/value pair.
pub fn get(store: &dyn ParameterStore, a: &[Value]) -> Result<Value, Error> {
    args::exactly("get", a, 1)?;
    let key = args::string("get", a, 0)?;
    to_value("get", Client::new(store).get(&key))
}

/// `gets KEY`, every key/value pair beneath a path.
pub fn gets(store: &dyn ParameterStore, a: &[Value]) -> Result<Value, Error> {
    args::exactly("gets", a, 1)?;
    let key = args::string("gets", a, 0)?;
    to_value("gets", Client::new(store).get_all(&key))
}

/// `getv KEY [DEFAULT]`, a single value.
pub fn getv(store: &dyn ParameterStore, a: &[Value]) -> Result<Value, Error> {
    args::between("getv", a, 1, 2)?;
    let key = args::string("getv", a, 0)?;
    let default = args::opt_string("getv", a, 1)?;
    to_value("getv", Client::new(store).get_value(&key, default.as_deref()))
}

/// `getvs KEY`, every value beneath a path.
pub fn getvs(store: &dyn ParameterStore, a: &[Value]) -> Result<Value, Error> {
    args::exactly("getvs", a, 1)?;
    let key = args::string("getvs", a, 0)?;
    to_value("getvs", Client::new(store).get_all_values(&key))
}

#[cfg(test)]
mod test {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::{get, gets, getv, getvs};
    use crate::store::{MemoryStore, ParameterStore, StoreError};

    fn store() -> MemoryStore {
        MemoryStore::from_iter([("/app/db/host", "db.internal"), ("/app/db/port", "5432")])
    }

    struct Unreachable;

    impl ParameterStore for Unreachable {
        fn get_parameter(&self, name: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Request {
                key: name.to_string(),
                message: "connection refused".to_string(),
            })
        }

        fn get_parameters_by_path(
            &self,
            path: &str,
        ) -> Result<BTreeMap<String, String>, StoreError> {
            self.get_parameter(path).map(|_| BTreeMap::new())
        }
    }

    #[test]
    fn test_lookups() {
        let store = store();
        assert_eq!(json!("db.internal"), getv(&store, &[json!("/app/db/host")]).unwrap());
        assert_eq!(
            json!({"Key": "/app/db/port", "Value": "5432"}),
            get(&store, &[json!("/app/db/port")]).unwrap()
        );
        assert_eq!(
            json!([
                {"Key": "/app/db/host", "Value": "db.internal"},
                {"Key": "/app/db/port", "Value": "5432"},
            ]),
            gets(&store, &[json!("/app/db")]).unwrap()
        );
        assert_eq!(json!(["db.internal", "5432"]), getvs(&store, &[json!("/app")]).unwrap());
    }

    #[test]
    fn test_getv_default_only_on_failure() {
        let store = store();
        assert_eq!(
            json!(""),
            getv(&store, &[json!("/app/db/user"), json!("fallback")]).unwrap()
        );
        assert_eq!(
            json!("fallback"),
            getv(&Unreachable, &[json!("/app/db/user"), json!("fallback")]).unwrap()
        );

        match getv(&Unreachable, &[json!("/app/db/user")]) {
            Err(err) => assert!(err.to_string().contains("connection refused")),
            Ok(_) => panic!("getv without a default should fail"),
        }
    }

    #[test]
    fn test_arity() {
        let store = store();
        assert!(getv(&store, &[]).is_err());
        assert!(get(&store, &[json!("a"), json!("b")]).is_err());
        assert!(gets(&store, &[json!(1)]).is_err());
    }
}
