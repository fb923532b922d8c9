use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use morph_dict::{Language, LoadMode};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use morph_server::{AppState, DictionarySource, load_dictionary, router};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_LANGUAGE: &str = "english";
const DEFAULT_DICT_DIR: &str = "dictionaries";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = load_config()?;
    info!("binding to {}:{}", config.host, config.port);
    info!(
        "using {} dictionary from {} ({:?})",
        config.language.name(),
        config.source.path().display(),
        config.source
    );
    if config.disable_cache {
        info!("cache headers disabled");
    }

    let start = Instant::now();
    let dict = load_dictionary(&config.source, config.language.clone()).with_context(|| {
        format!(
            "loading {} dictionary from {}",
            config.language.name(),
            config.source.path().display()
        )
    })?;
    info!(
        "dictionary ready in {} ms ({} records)",
        start.elapsed().as_millis(),
        dict.len()
    );

    let state = AppState {
        dict,
        disable_cache: config.disable_cache,
    };

    let app = router(state).layer(TraceLayer::new_for_http());
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.host, config.port))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Debug, Clone)]
struct Config {
    host: String,
    port: u16,
    language: Language,
    source: DictionarySource,
    disable_cache: bool,
}

fn load_config() -> Result<Config> {
    let mut disable_cache = false;
    let mut cli_dict: Option<PathBuf> = None;
    let mut cli_wordlist: Option<PathBuf> = None;
    let mut cli_language: Option<String> = None;
    let mut cli_mode: Option<LoadMode> = None;
    for arg in env::args().skip(1) {
        if arg == "--no-cache" {
            disable_cache = true;
        } else if let Some(path) = arg.strip_prefix("--dict=") {
            cli_dict = Some(PathBuf::from(path));
        } else if let Some(path) = arg.strip_prefix("--wordlist=") {
            cli_wordlist = Some(PathBuf::from(path));
        } else if let Some(name) = arg.strip_prefix("--language=") {
            cli_language = Some(name.to_string());
        } else if let Some(mode) = arg.strip_prefix("--load-mode=") {
            cli_mode = parse_load_mode(mode);
        }
    }

    let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    let language_name = cli_language
        .or_else(|| env::var("MORPH_LANGUAGE").ok())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
    let language = Language::by_name(&language_name)
        .with_context(|| format!("unsupported language {language_name:?}"))?;
    let mode = cli_mode
        .or_else(|| {
            env::var("MORPH_LOAD_MODE")
                .ok()
                .as_deref()
                .and_then(parse_load_mode)
        })
        .unwrap_or(LoadMode::Mmap);

    // A compiled resource wins over a word list named at the same level.
    let source = if let Some(path) = cli_dict {
        DictionarySource::Compiled { path, mode }
    } else if let Some(path) = cli_wordlist {
        DictionarySource::WordList(path)
    } else if let Ok(path) = env::var("MORPH_DICT") {
        DictionarySource::Compiled {
            path: PathBuf::from(path),
            mode,
        }
    } else if let Ok(path) = env::var("MORPH_WORDLIST") {
        DictionarySource::WordList(PathBuf::from(path))
    } else {
        DictionarySource::Compiled {
            path: default_dict_path(&language),
            mode,
        }
    };

    Ok(Config {
        host,
        port,
        language,
        source,
        disable_cache,
    })
}

fn default_dict_path(language: &Language) -> PathBuf {
    PathBuf::from(DEFAULT_DICT_DIR).join(format!("{}.morph", language.name()))
}

fn parse_load_mode(raw: &str) -> Option<LoadMode> {
    match raw.to_ascii_lowercase().as_str() {
        "mmap" => Some(LoadMode::Mmap),
        "owned" => Some(LoadMode::Owned),
        _ => None,
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .init();
}
