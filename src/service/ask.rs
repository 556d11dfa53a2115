use anyhow::Result;
use std::path::PathBuf;

use crate::config::{load_dotenv, AppConfig};
use crate::ui::Output;

use super::{run, Providers};

pub struct AskOptions {
    /// 为空时使用配置中的默认问题
    pub query: Option<String>,
    pub config_path: Option<PathBuf>,
    pub show_sources: bool,
}

pub async fn ask(options: AskOptions) -> Result<()> {
    let output = Output::new();

    load_dotenv();
    let config = AppConfig::load(options.config_path.as_deref())?;

    let query = match options.query {
        Some(q) if !q.trim().is_empty() => q,
        Some(_) => {
            output.warning("empty question given, using the configured query");
            config.query.clone()
        }
        None => config.query.clone(),
    };

    let response = run(
        &config,
        |var| std::env::var(var).ok(),
        Providers::from_config,
        &query,
        &output,
    )
    .await?;

    output.answer(&response);
    if options.show_sources {
        output.sub_answers(&response.sub_answers);
    }

    Ok(())
}
