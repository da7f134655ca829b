//! DNS helpers. Lookup failures never fail a render; they produce an empty
//! list.

use std::collections::BTreeSet;
use std::net::{IpAddr, ToSocketAddrs};

use hickory_resolver::Resolver;
use lithos_gotmpl_core::Error;
use log::debug;
use serde::Serialize;
use serde_json::Value;

use super::args::{self, error};

/// An SRV record, exposed to templates with `.Target`, `.Port`, `.Priority`
/// and `.Weight`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Srv {
    pub target: String,
    pub port: u16,
    pub priority: u16,
    pub weight: u16,
}

impl Srv {
    #[inline]
    fn sort_key(&self) -> String {
        format!("{}{}{}{}", self.target, self.port, self.priority, self.weight)
    }
}

pub fn lookup_ip(a: &[Value]) -> Result<Value, Error> {
    args::exactly("lookupIP", a, 1)?;
    let host = args::string("lookupIP", a, 0)?;
    Ok(args::string_list(resolve(&host, |_| true)))
}

pub fn lookup_ipv4(a: &[Value]) -> Result<Value, Error> {
    args::exactly("lookupIPV4", a, 1)?;
    let host = args::string("lookupIPV4", a, 0)?;
    Ok(args::string_list(resolve(&host, IpAddr::is_ipv4)))
}

pub fn lookup_ipv6(a: &[Value]) -> Result<Value, Error> {
    args::exactly("lookupIPV6", a, 1)?;
    let host = args::string("lookupIPV6", a, 0)?;
    Ok(args::string_list(resolve(&host, IpAddr::is_ipv6)))
}

/// `lookupSRV SERVICE PROTO NAME` queries `_SERVICE._PROTO.NAME`, or `NAME`
/// directly when service and proto are both empty.
pub fn lookup_srv(a: &[Value]) -> Result<Value, Error> {
    args::exactly("lookupSRV", a, 3)?;
    let service = args::string("lookupSRV", a, 0)?;
    let proto = args::string("lookupSRV", a, 1)?;
    let name = args::string("lookupSRV", a, 2)?;

    let records = resolve_srv(&srv_name(&service, &proto, &name));
    serde_json::to_value(records).map_err(|err| error(format!("lookupSRV: {}", err)))
}

/// Addresses of `host` matching `filter`, rendered and sorted.
#[inline]
fn resolve<F>(host: &str, filter: F) -> Vec<String>
where
    F: Fn(&IpAddr) -> bool,
{
    let addrs = match (host, 0).to_socket_addrs() {
        Ok(addrs) => addrs,
        Err(err) => {
            debug!("Failed to resolve {}: {}", host, err);
            return vec![];
        }
    };

    addrs
        .map(|addr| addr.ip())
        .filter(|ip| filter(ip))
        .map(|ip| ip.to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[inline]
fn srv_name(service: &str, proto: &str, name: &str) -> String {
    if service.is_empty() && proto.is_empty() {
        name.to_string()
    } else {
        format!("_{}._{}.{}", service, proto, name)
    }
}

fn resolve_srv(name: &str) -> Vec<Srv> {
    let lookup = Resolver::from_system_conf()
        .map_err(|err| err.to_string())
        .and_then(|resolver| resolver.srv_lookup(name).map_err(|err| err.to_string()));

    let lookup = match lookup {
        Ok(lookup) => lookup,
        Err(err) => {
            debug!("Failed to look up SRV records for {}: {}", name, err);
            return vec![];
        }
    };

    let mut records: Vec<Srv> = lookup
        .iter()
        .map(|srv| Srv {
            target: srv.target().to_string(),
            port: srv.port(),
            priority: srv.priority(),
            weight: srv.weight(),
        })
        .collect();
    sort_srv(&mut records);
    records
}

#[inline]
fn sort_srv(records: &mut [Srv]) {
    records.sort_by_cached_key(Srv::sort_key);
}
