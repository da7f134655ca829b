use std::io::{self, Write};
use std::sync::Arc;

use lithos_gotmpl_core::Template;
use log::debug;
use serde_json::Value;

use crate::funcs;
use crate::store::ParameterStore;

/// The value of `.` in rendered templates.
pub const DATA: &str = "none";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("couldn't parse template: {0}")]
    Parse(String),
    #[error("couldn't render template: {0}")]
    Render(String),
    #[error("couldn't write rendered template")]
    Io(#[from] io::Error),
}

/// Renders Go templates against a parameter store.
#[derive(Clone)]
pub struct Renderer {
    store: Arc<dyn ParameterStore>,
}

impl Renderer {
    #[inline]
    pub fn new<S: ParameterStore + 'static>(store: S) -> Self {
        Self::from_arc(Arc::new(store))
    }

    #[inline]
    pub fn from_arc(store: Arc<dyn ParameterStore>) -> Self {
        Self { store }
    }

    pub fn render(&self, template: &str) -> Result<String, Error> {
        let registry = funcs::registry(&self.store);
        let tmpl = Template::parse_with_functions("stdin", template, registry)
            .map_err(|err| Error::Parse(err.to_string()))?;
        debug!("Parsed template ({} bytes)", template.len());

        tmpl.render(&Value::String(DATA.to_string()))
            .map_err(|err| Error::Render(err.to_string()))
    }

    /// Renders fully before writing, so a failed render writes nothing.
    #[inline]
    pub fn render_to<W: Write>(&self, template: &str, mut writer: W) -> Result<(), Error> {
        let rendered = self.render(template)?;
        writer.write_all(rendered.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{Error, Renderer};
    use crate::store::MemoryStore;

    fn renderer() -> Renderer {
        Renderer::new(MemoryStore::from_iter([
            ("/app/db/host", "db.internal"),
            ("/app/db/port", "5432"),
            ("/app/name", "demo"),
            ("/app/upstreams/long-name", "b"),
            ("/app/upstreams/a", "a"),
        ]))
    }

    fn render(template: &str) -> String {
        renderer().render(template).unwrap()
    }

    #[test]
    fn test_getv() {
        assert_eq!("host=db.internal", render(r#"host={{getv "/app/db/host"}}"#));
        assert_eq!("user=", render(r#"user={{getv "/app/db/user" "app"}}"#));
        assert_eq!("user=", render(r#"user={{getv "/app/db/user"}}"#));
    }

    #[test]
    fn test_getv_missing_ignores_default() {
        let renderer = Renderer::new(MemoryStore::from_iter([("/a/b", "1")]));
        assert_eq!("", renderer.render(r#"{{getv "/missing" "dflt"}}"#).unwrap());
        assert_eq!("1", renderer.render(r#"{{getv "/a/b" "dflt"}}"#).unwrap());
    }

    #[test]
    fn test_get() {
        assert_eq!(
            "/app/db/port:5432",
            render(r#"{{with get "/app/db/port"}}{{.Key}}:{{.Value}}{{end}}"#)
        );
    }

    #[test]
    fn test_gets() {
        assert_eq!(
            "/app/db/host=db.internal\n/app/db/port=5432\n",
            render("{{range gets \"/app/db\"}}{{.Key}}={{.Value}}\n{{end}}")
        );
    }

    #[test]
    fn test_getvs() {
        assert_eq!("db.internal,5432,", render(r#"{{range getvs "/app/db"}}{{.}},{{end}}"#));
    }

    #[test]
    fn test_helpers() {
        assert_eq!("HOST", render(r#"{{base "/app/db/host" | toUpper}}"#));
        assert_eq!("123", render("{{range seq 1 3}}{{.}}{{end}}"));
        assert_eq!("a-b", render(r#"{{join (split "a,b" ",") "-"}}"#));
        assert_eq!(
            "6",
            render(r#"{{add (atoi (trimSuffix (getv "/app/db/port") "432")) 1}}"#)
        );
        assert_eq!(
            "a,b,",
            render(r#"{{range sortKVByLength (gets "/app/upstreams")}}{{.Value}},{{end}}"#)
        );
        assert_eq!("x-x-a", render(r#"{{replace "a-a-a" "a" "x" 2}}"#));
        assert_eq!("0", render(r#"{{len (json "null")}}"#));
    }

    #[test]
    fn test_sprig_helpers() {
        assert_eq!("ab", render(r#"{{trunc 2 "abcd"}}"#));
        assert_eq!("DEMO", render(r#"{{getv "/app/name" | upper}}"#));
        assert_eq!("friend", render(r#"{{default "friend" (getv "/app/db/user")}}"#));
    }

    #[test]
    fn test_data() {
        assert_eq!("none", render("{{.}}"));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(renderer().render("{{getv"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_render_error() {
        assert!(matches!(renderer().render("{{div 1 0}}"), Err(Error::Render(_))));
        assert!(matches!(renderer().render("{{getv 1}}"), Err(Error::Render(_))));
    }

    #[test]
    fn test_render_to() {
        let mut out = Vec::new();
        renderer()
            .render_to(r#"{{getv "/app/name"}}"#, &mut out)
            .unwrap();
        assert_eq!(b"demo".to_vec(), out);

        let mut out = Vec::new();
        assert!(renderer().render_to("{{div 1 0}}", &mut out).is_err());
        assert!(out.is_empty());
    }
}
