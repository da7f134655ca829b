use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use crate::render::{self, Renderer};
use crate::store::{EnvStore, FileStore, ParameterStore, SsmOptions, SsmStore};

#[derive(Parser, Debug)]
#[command(version = clap::crate_version!(), author = clap::crate_authors!(), about = clap::crate_description!())]
pub struct Options {
    #[arg(short, long, action = clap::ArgAction::Count, help = "Message verbosity")]
    pub verbosity: u8,
    #[arg(short, long, help = "Silence all output")]
    pub quiet: bool,

    #[arg(
        short,
        long,
        value_enum,
        default_value_t = Backend::Ssm,
        env = "SSM_RENDER_BACKEND",
        help = "Parameter store to read from"
    )]
    pub backend: Backend,
    #[arg(
        short,
        long,
        env = "SSM_RENDER_FILE",
        required_if_eq("backend", "file"),
        help = "Parameter file for the file backend"
    )]
    pub file: Option<PathBuf>,
    #[arg(long, help = "AWS region (defaults to the SDK's region chain)")]
    pub region: Option<String>,
    #[arg(long, env = "SSM_RENDER_ENDPOINT_URL", help = "Alternate SSM endpoint URL")]
    pub endpoint_url: Option<String>,

    #[arg(short, long, help = "Read the template from a file instead of stdin")]
    pub template: Option<PathBuf>,
    #[arg(short, long, help = "Write to a file instead of stdout")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    Ssm,
    Env,
    File,
}

#[inline]
pub fn cli(opts: &Options) -> Result<()> {
    let input: Box<dyn Read> = match &opts.template {
        Some(path) => Box::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        ),
        None => Box::new(io::stdin()),
    };

    match &opts.output {
        Some(path) => {
            let mut rendered = Vec::new();
            run(opts, input, &mut rendered)?;
            fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => run(opts, input, io::stdout().lock())?,
    }

    Ok(())
}

/// Reads a template from `input`, renders it against the store selected by
/// `opts` and writes the result to `output`. Nothing is written when
/// rendering fails.
pub fn run<R, W>(opts: &Options, mut input: R, output: W) -> Result<()>
where
    R: Read,
    W: Write,
{
    let mut template = String::new();
    input
        .read_to_string(&mut template)
        .context("failed to read template")?;

    let store = open_store(opts).context("failed to create parameter store client")?;
    match Renderer::from_arc(store).render_to(&template, output) {
        Ok(()) => Ok(()),
        Err(err @ render::Error::Io(_)) => Err(err).context("failed to write output"),
        Err(err) => Err(err).context("failed to render template"),
    }
}

#[inline]
fn open_store(opts: &Options) -> Result<Arc<dyn ParameterStore>> {
    let store: Arc<dyn ParameterStore> = match opts.backend {
        Backend::Ssm => Arc::new(SsmStore::new(&SsmOptions {
            region: opts.region.clone(),
            endpoint_url: opts.endpoint_url.clone(),
        })?),
        Backend::Env => Arc::new(EnvStore::new()),
        Backend::File => {
            let path = opts
                .file
                .as_ref()
                .context("the file backend requires --file")?;
            Arc::new(FileStore::open(path)?)
        }
    };
    Ok(store)
}

#[cfg(test)]
mod test {
    use std::ffi::OsStr;
    use std::fs;
    use std::io::Cursor;
    use std::path::PathBuf;

    use clap::Parser;

    use super::{cli, run, Backend, Options};

    fn file_options(params: PathBuf) -> Options {
        Options {
            verbosity: 0,
            quiet: true,
            backend: Backend::File,
            file: Some(params),
            region: None,
            endpoint_url: None,
            template: None,
            output: None,
        }
    }

    #[test]
    fn test_defaults() {
        let opts = Options::try_parse_from(["ssm-render"]).unwrap();
        assert_eq!(Backend::Ssm, opts.backend);
        assert_eq!(0, opts.verbosity);
        assert!(opts.template.is_none());
        assert!(opts.output.is_none());
    }

    #[test]
    fn test_flags() {
        let opts = Options::try_parse_from([
            "ssm-render",
            "-vv",
            "--backend",
            "file",
            "--file",
            "params.yaml",
            "--region",
            "eu-west-1",
        ])
        .unwrap();
        assert_eq!(2, opts.verbosity);
        assert_eq!(Backend::File, opts.backend);
        assert_eq!(Some("eu-west-1"), opts.region.as_deref());
    }

    #[test]
    fn test_file_backend_requires_file() {
        assert!(Options::try_parse_from(["ssm-render", "--backend", "file"]).is_err());
    }

    #[test]
    fn test_cli_file_backend() {
        let dir = tempfile::tempdir().unwrap();
        let params = dir.path().join("params.yaml");
        let template = dir.path().join("app.conf.tmpl");
        let output = dir.path().join("app.conf");

        fs::write(&params, "app:\n  db:\n    host: db.internal\n    port: 5432\n").unwrap();
        fs::write(
            &template,
            "{{range gets \"/app/db\"}}{{base .Key}}={{.Value}}\n{{end}}",
        )
        .unwrap();

        let opts = Options::try_parse_from([
            OsStr::new("ssm-render"),
            OsStr::new("--backend"),
            OsStr::new("file"),
            OsStr::new("--file"),
            params.as_os_str(),
            OsStr::new("--template"),
            template.as_os_str(),
            OsStr::new("--output"),
            output.as_os_str(),
        ])
        .unwrap();

        cli(&opts).unwrap();
        assert_eq!(
            "host=db.internal\nport=5432\n",
            fs::read_to_string(&output).unwrap()
        );
    }

    #[test]
    fn test_cli_render_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let params = dir.path().join("params.json");
        let template = dir.path().join("bad.tmpl");
        let output = dir.path().join("out");

        fs::write(&params, "{}").unwrap();
        fs::write(&template, "{{div 1 0}}").unwrap();

        let opts = Options {
            template: Some(template),
            output: Some(output.clone()),
            ..file_options(params)
        };

        let err = cli(&opts).unwrap_err();
        assert!(err.to_string().contains("failed to render template"));
        assert!(!output.exists());
    }

    #[test]
    fn test_run_reads_input_and_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let params = dir.path().join("params.toml");
        fs::write(&params, "[app]\nname = \"demo\"\nreplicas = 3\n").unwrap();

        let opts = file_options(params);
        let input = Cursor::new(r#"name={{getv "/app/name"}} replicas={{getv "/app/replicas"}}"#);
        let mut output = Vec::new();
        run(&opts, input, &mut output).unwrap();
        assert_eq!(b"name=demo replicas=3".to_vec(), output);
    }

    #[test]
    fn test_run_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let params = dir.path().join("params.json");
        fs::write(&params, "{}").unwrap();

        let opts = file_options(params);
        let mut output = Vec::new();
        let err = run(&opts, Cursor::new("{{getv"), &mut output).unwrap_err();
        assert!(err.to_string().contains("failed to render template"));
        assert!(output.is_empty());
    }
}
