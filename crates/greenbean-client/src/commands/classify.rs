use std::fs;
use std::io::Read;
use std::path::Path;

use crate::classify::classify;
use crate::commands::common::load_allow_list;
use crate::config::AppConfig;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::ClassifyData;
use crate::extraction::decode_line_items;
use crate::state::resolve_home;
use crate::{ClientError, ClientResult};

#[derive(Debug, Default)]
pub struct ClassifyOptions<'a> {
    pub path: String,
    pub home_override: Option<&'a Path>,
    pub stdin_override: Option<String>,
}

pub fn run(path: String) -> ClientResult<SuccessEnvelope> {
    run_with_options(ClassifyOptions {
        path,
        home_override: None,
        stdin_override: None,
    })
}

/// Classifies a saved extraction response body without touching rewards.
#[doc(hidden)]
pub fn run_with_options(options: ClassifyOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let home = resolve_home(options.home_override)?;
    let config = AppConfig::load(Some(&home))?;
    let body = read_source(&options.path, options.stdin_override)?;

    let raw_items = decode_line_items(body.as_bytes()).map_err(ClientError::from)?;
    let allow_list = load_allow_list(&config)?;
    let classification = classify(&raw_items, &allow_list);

    let data = ClassifyData {
        path: options.path,
        allow_list_source: allow_list.source().describe(),
        items: classification.items,
        sustainable_subtotal: classification.sustainable_subtotal,
        dropped_items: classification.dropped,
    };

    success("classify", data)
}

fn read_source(path: &str, stdin_override: Option<String>) -> ClientResult<String> {
    if path == "-" {
        if let Some(content) = stdin_override {
            return Ok(content);
        }
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|error| source_error(path, &error.to_string()))?;
        return Ok(content);
    }

    fs::read_to_string(path).map_err(|error| source_error(path, &error.to_string()))
}

fn source_error(path: &str, detail: &str) -> ClientError {
    ClientError::invalid_argument_with_recovery(
        &format!("Could not read extraction response `{path}`: {detail}"),
        vec![
            "Pass the path of a saved extraction JSON body, or `-` for stdin.".to_string(),
            "Run `greenbean classify --help` for usage.".to_string(),
        ],
    )
}
