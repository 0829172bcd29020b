use anyhow::Context;
use clap::Parser;
use road_proximity::config::cli::Command;
use road_proximity::core::handler::HttpResponse;
use road_proximity::domain::ports::ListStore;
use road_proximity::utils::{logger, validation::Validate};
use road_proximity::{CliConfig, MemoryListStore, RequestHandler};
use serde_json::json;
use tokio::io::AsyncReadExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting road-proximity CLI");
    if cli.verbose {
        tracing::debug!("CLI arguments: {:?}", cli);
    }

    // 載入並驗證配置
    let config = cli.service_config().context("failed to load configuration")?;
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let exit_code = if cli.memory_store {
        tracing::info!("Using in-memory point store");
        let handler = config.build_handler(MemoryListStore::new())?;
        run(&handler, &cli.command).await?
    } else {
        let handler = config.build_handler(config.redis_store()?)?;
        run(&handler, &cli.command).await?
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

async fn run<S: ListStore>(handler: &RequestHandler<S>, command: &Command) -> anyhow::Result<i32> {
    match command {
        Command::Demo => run_demo(handler).await,
        Command::Invoke { body } => {
            let body = if body == "-" {
                let mut buffer = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut buffer)
                    .await
                    .context("failed to read request body from stdin")?;
                buffer
            } else {
                body.clone()
            };
            Ok(print_response(&handler.handle("POST", Some(&body)).await))
        }
        single => {
            let body = single
                .request_body()
                .context("subcommand has no request body")?
                .to_string();
            Ok(print_response(&handler.handle("POST", Some(&body)).await))
        }
    }
}

/// 依序執行範例請求：儲存三個點、計算距離、查詢附近的點
async fn run_demo<S: ListStore>(handler: &RequestHandler<S>) -> anyhow::Result<i32> {
    let store_requests = [
        ("Main Street Delhi", 28.7041, 77.1025, 5.2),
        ("Park Avenue Bhopal", 23.2599, 77.4126, 3.7),
        ("River Road Kolkata", 22.5726, 88.3639, 2.5),
    ];

    let mut worst = 0;

    println!("===== STORING ROAD POINTS =====");
    for (name, latitude, longitude, distance) in store_requests {
        let body = json!({
            "action": "storeRoadPoint",
            "roadName": name,
            "latitude": latitude,
            "longitude": longitude,
            "distance": distance,
        });
        worst = worst.max(print_response(&handler.handle("POST", Some(&body.to_string())).await));
    }

    println!("\n===== CALCULATE DISTANCE =====");
    let body = json!({
        "action": "calculateDistance",
        "latitude1": 22.5726,
        "longitude1": 88.3639,
        "latitude2": 28.7041,
        "longitude2": 77.1025,
    });
    worst = worst.max(print_response(&handler.handle("POST", Some(&body.to_string())).await));

    println!("\n===== CHECK NEARBY POINTS =====");
    let body = json!({
        "action": "checkNearby",
        "latitude": 23.25204561436272,
        "longitude": 77.48521347885162,
    });
    worst = worst.max(print_response(&handler.handle("POST", Some(&body.to_string())).await));

    Ok(worst)
}

/// Print the response and map its status to an exit code.
fn print_response(response: &HttpResponse) -> i32 {
    let body = serde_json::from_str::<serde_json::Value>(&response.body)
        .ok()
        .and_then(|v| serde_json::to_string_pretty(&v).ok())
        .unwrap_or_else(|| response.body.clone());
    println!("{} {}", response.status_code, body);

    match response.status_code {
        200..=299 => 0,
        400..=499 => 1,
        _ => 2,
    }
}
