// sitewire CLI: loads the site markup and translations, boots the behavior
// layer and writes localized HTML. One page load end to end: synchronous
// wiring, the single async translation fetch, then the binder.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sitewire::{binder, calendar};
use sitewire::{Document, PageRuntime, SiteConfig, TranslationStore};

#[derive(Parser, Debug)]
#[command(name = "sitewire", about = "Localizes and wires the static event site")]
struct Cli {
    /// Path to the page markup
    #[arg(short, long, default_value = "index.html")]
    page: PathBuf,

    /// Path to the translation resource
    #[arg(short, long, default_value = "i18n.json")]
    i18n: PathBuf,

    /// Path to the preferences file
    #[arg(short, long, default_value = "sitewire.toml")]
    config: PathBuf,

    /// Language to render; defaults to the negotiated language
    #[arg(short, long)]
    lang: Option<String>,

    /// Render every supported language to `<page stem>.<lang>.html`
    #[arg(long, conflicts_with = "lang")]
    all: bool,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = SiteConfig::load(&cli.config)?;

    // Logs go to stderr so the rendered page can stream to stdout.
    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let markup = std::fs::read_to_string(&cli.page)
        .with_context(|| format!("Failed to read page: {}", cli.page.display()))?;

    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    let store = rt.block_on(TranslationStore::load(&cli.i18n));

    if cli.all {
        return render_all(&markup, &store, &cli);
    }

    if let Some(lang) = &cli.lang {
        config.site_lang = Some(lang.clone());
    }
    let runtime = PageRuntime::bootstrap(Document::parse(&markup), store, config, cli.config);
    tracing::info!("rendered page in language {}", runtime.active_language());
    write_output(cli.out.as_deref(), &runtime.html())
}

/// Applies the binder for each supported language over a fresh copy of the
/// page and writes one output file per language.
fn render_all(markup: &str, store: &TranslationStore, cli: &Cli) -> Result<()> {
    let base = {
        let mut doc = Document::parse(markup);
        calendar::setup(&mut doc);
        doc
    };
    let stem = cli
        .page
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("index");
    for lang in sitewire::i18n::SUPPORTED_LANGS {
        let mut doc = base.clone();
        binder::apply(&mut doc, store, lang);
        let path = cli
            .page
            .with_file_name(format!("{}.{}.html", stem, lang));
        std::fs::write(&path, doc.to_html())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("wrote {}", path.display());
    }
    Ok(())
}

fn write_output(out: Option<&std::path::Path>, html: &str) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, html)
            .with_context(|| format!("Failed to write output: {}", path.display())),
        None => {
            println!("{}", html);
            Ok(())
        }
    }
}
