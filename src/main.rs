// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::Context;
use clap::Parser;
use enrichrs::application::items::build_request_items;
use enrichrs::config::settings::Settings;
use enrichrs::domain::models::enrichment::EntityKind;
use enrichrs::domain::services::bulk_job_client::BulkEnrichmentJobClient;
use enrichrs::infrastructure::http_enrichment_api::HttpEnrichmentApi;
use enrichrs::infrastructure::observability::metrics::init_metrics;
use enrichrs::utils::telemetry;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// 批量富化命令行
#[derive(Debug, Parser)]
#[command(name = "enrichrs", version, about = "Bulk company and people enrichment")]
struct Cli {
    /// Entity kind of the input rows (company or person)
    #[arg(long, default_value = "company")]
    kind: EntityKind,

    /// File with one domain or LinkedIn profile URL per line
    input: PathBuf,
}

/// 主函数
///
/// 读取输入文件，提交批量富化任务，并把每条结果以JSON行写到标准输出
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1. Initialize logging
    telemetry::init_telemetry();

    // 2. Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    settings.check()?;
    info!("Configuration loaded");

    if settings.metrics.enabled {
        init_metrics(&settings.metrics.listen_addr)?;
    }

    // 3. Prepare request items
    let content = tokio::fs::read_to_string(&cli.input)
        .await
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let prepared = build_request_items(cli.kind, content.lines());
    for skipped in &prepared.skipped {
        warn!(
            "Skipping row {} ({}): {:?}",
            skipped.row, skipped.reason, skipped.raw
        );
    }
    if prepared.items.is_empty() {
        warn!("No valid {} rows in {}", cli.kind, cli.input.display());
        return Ok(());
    }

    // 4. Build the client
    let api = Arc::new(HttpEnrichmentApi::new(cli.kind, &settings.api)?);
    let client = BulkEnrichmentJobClient::new(api, settings.enrichment_config())?;

    let cancel = client.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling outstanding jobs");
            cancel.cancel();
        }
    });

    // 5. Run and emit results
    let results = client.enrich(prepared.items).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for result in &results {
        serde_json::to_writer(&mut out, result)?;
        writeln!(out)?;
    }
    out.flush()?;

    Ok(())
}
