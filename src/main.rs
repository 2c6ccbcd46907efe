use car_auction_common::{Catalog, CatalogStore};
use car_auction_rust::{cli, config, error, ingest, sources};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use error::{AuctionError, Result};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Parse { titles } => {
            let store = open_store(&config);
            let records: Vec<_> = titles.iter().map(|t| store.parse_title(Some(t))).collect();
            println!("{}", serde_json::to_string_pretty(&records)?);
        }

        Commands::Ingest { input, date, output, quiet } => {
            let path = match (input, date.as_deref()) {
                (Some(path), _) => path,
                (None, Some(date)) => sources::resolve_auction_source(&config.sources_dir(), date)?.path,
                (None, None) => {
                    return Err(AuctionError::Config(
                        "CSV 파일이나 --date 중 하나는 필요합니다".into(),
                    ))
                }
            };

            let store = open_store(&config);
            let show_progress = !quiet && output.is_some();
            let result = ingest::ingest_file(&store, &path, date.as_deref(), show_progress)?;

            match output {
                Some(out) => {
                    ingest::write_output(&result, &out)?;
                    eprintln!(
                        "✔ {}행 변환 (모델 매칭 {}, 트림 매칭 {}): {}",
                        result.stats.rows,
                        result.stats.matched_models,
                        result.stats.matched_trims,
                        out.display()
                    );
                }
                None => println!("{}", serde_json::to_string_pretty(&result)?),
            }
        }

        Commands::Dates { next } => {
            let dir = config.sources_dir();
            let files = sources::list_sources(&dir)?;
            if files.is_empty() {
                println!("{} 에 auction_data_YYMMDD.csv 파일이 없습니다", dir.display());
            }
            for file in files {
                if next {
                    println!("{}  → {}", file.date, sources::next_business_day(&file.date)?);
                } else {
                    println!("{}", file.date);
                }
            }
        }

        Commands::Catalog { find, check } => {
            if check {
                let catalog = match &config.catalog_path {
                    Some(path) => Catalog::from_file(path)?,
                    None => Catalog::bundled(),
                };
                catalog.validate()?;
                println!("✔ 카탈로그 id 중복 없음");
            }

            let store = open_store(&config);
            let snapshot = store.snapshot();
            match find {
                Some(name) => {
                    let found = snapshot.index.models_named(&name);
                    if found.is_empty() {
                        println!("'{}' 모델이 없습니다", name);
                    }
                    for hit in found {
                        println!(
                            "{} ({}) / {} ({}) 트림 {}개",
                            hit.manufacturer.label,
                            hit.manufacturer.id,
                            hit.model.model,
                            hit.model.id,
                            hit.model.trims.len()
                        );
                    }
                }
                None => {
                    println!("카탈로그:");
                    println!("  제조사: {}", snapshot.index.manufacturers().len());
                    println!("  모델: {}", snapshot.index.model_count());
                    println!("  트림: {}", snapshot.index.trim_count());
                    println!("  제조사 별칭: {}", snapshot.aliases.manufacturer_alias_count());
                    println!("  모델 변형: {}", snapshot.aliases.model_variation_count());
                    println!("  지문: {}", snapshot.fingerprint);
                }
            }
        }

        Commands::Config { set_sources_dir, show } => {
            let mut config = config;

            if let Some(dir) = set_sources_dir {
                config.set_sources_dir(dir)?;
                println!("✔ 소스 폴더를 설정했습니다");
            }

            if show {
                let describe = |path: &Option<std::path::PathBuf>| {
                    path.as_ref()
                        .map_or_else(|| "번들".to_string(), |p| p.display().to_string())
                };
                println!("설정 ({}):", Config::config_path()?.display());
                println!("  카탈로그: {}", describe(&config.catalog_path));
                println!("  제조사 별칭: {}", describe(&config.manufacturer_aliases_path));
                println!("  모델 변형: {}", describe(&config.model_variations_path));
                println!("  소스 폴더: {}", config.sources_dir().display());
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "car_auction=debug,car_auction_common=debug,car_auction_rust=debug"
    } else {
        "car_auction=info,car_auction_common=info,car_auction_rust=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_store(config: &Config) -> CatalogStore {
    CatalogStore::new(config.catalog_sources()).with_weights(config.score_weights.clone())
}
