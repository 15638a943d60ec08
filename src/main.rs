use anyhow::{Context, Result};
use clap::Parser;
use food_link::catalog::{self, TableSources, Tables};
use food_link::cli::{Cli, Commands};
use food_link::config::Config;
use food_link::merger::{DatabaseMerger, MergeOptions};
use food_link::output::{write_json, EquivalencesDocument, TaggingDocument};
use food_link_common::{
    CompositeTagger, ForeignIngredientRecord, IngredientIndex, MatchResolver, NativeFoodRecord,
    ResolverOptions,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn init_logging(config: &Config, verbose: bool) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        config.log_filter()
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn spinner(message: &str) -> Result<ProgressBar> {
    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]")?);
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    Ok(bar)
}

fn load_tables(cli: &Cli, config: &Config) -> Result<Tables> {
    let sources = TableSources::resolve(config, cli.translations.as_deref(), cli.keywords.as_deref());
    catalog::load_tables(&sources).context("辞書テーブルの読み込みに失敗")
}

fn load_catalogs(
    foreign: &Path,
    native: &Path,
) -> Result<(Vec<ForeignIngredientRecord>, Vec<NativeFoodRecord>)> {
    let foreign = catalog::load_foreign(foreign)
        .with_context(|| format!("FODMAPリストの読み込みに失敗: {}", foreign.display()))?;
    let native = catalog::load_native(native)
        .with_context(|| format!("栄養成分表の読み込みに失敗: {}", native.display()))?;
    println!("✔ FODMAPリスト: {}件 / 栄養成分表: {}件\n", foreign.len(), native.len());
    Ok((foreign, native))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    init_logging(&config, cli.verbose);

    let parallel = config.parallel && !cli.sequential;

    match &cli.command {
        Commands::Match { foreign, native, output } => {
            println!("🔗 food-link - 照合\n");

            println!("[1/3] カタログを読み込み中...");
            let tables = load_tables(&cli, &config)?;
            let (foreign, native) = load_catalogs(foreign, native)?;

            println!("[2/3] 照合中...");
            let bar = spinner("FODMAPレコードを照合中")?;
            let results = MatchResolver::new(&tables.translations)
                .with_options(ResolverOptions { parallel })
                .resolve_matches(&foreign, &native);
            bar.finish_and_clear();

            let document = EquivalencesDocument::new(&foreign, &native, &results);
            println!(
                "✔ {}件照合（辞書: {} / 辞書類似: {} / 類似度: {}） 照合率: {}\n",
                document.metadata.total_matches,
                document.metadata.dictionary_matches,
                document.metadata.dictionary_partial_matches,
                document.metadata.similarity_matches,
                document.metadata.match_rate
            );

            println!("[3/3] 結果を保存中...");
            write_json(output, &document)?;
            println!("✔ 結果を保存: {}", output.display());

            println!("\n✅ 照合完了");
        }

        Commands::Tag { foreign, native, output, only_multiple } => {
            println!("🍲 food-link - 料理分解\n");

            println!("[1/3] カタログを読み込み中...");
            let tables = load_tables(&cli, &config)?;
            let (foreign, native) = load_catalogs(foreign, native)?;

            println!("[2/3] 料理名を分解中...");
            let bar = spinner("キーワードを検出中")?;
            let index = IngredientIndex::build(&foreign);
            let annotations =
                CompositeTagger::new(&index, &tables.keywords).tag_all(&native, parallel);
            bar.finish_and_clear();

            let document = TaggingDocument::new(&native, &annotations, *only_multiple);
            println!(
                "✔ 単一食材: {} / 複数食材: {} / 該当なし: {}\n",
                document.metadata.single_ingredient,
                document.metadata.multiple_ingredients,
                document.metadata.untagged
            );

            println!("[3/3] 結果を保存中...");
            write_json(output, &document)?;
            println!("✔ 結果を保存: {}（{}件）", output.display(), document.dishes.len());

            println!("\n✅ 分解完了");
        }

        Commands::Merge { foreign, native, output, no_decompose } => {
            println!("🚀 food-link - 統合データベース生成\n");

            println!("[1/3] カタログを読み込み中...");
            let tables = load_tables(&cli, &config)?;
            let (foreign, native) = load_catalogs(foreign, native)?;

            println!("[2/3] 照合・分解中...{}", if *no_decompose { " (分解なし)" } else { "" });
            let bar = spinner("統合中")?;
            let database = DatabaseMerger::new(&tables.translations, &tables.keywords)
                .with_options(MergeOptions {
                    decompose: !no_decompose,
                    parallel,
                })
                .merge(&foreign, &native);
            bar.finish_and_clear();

            let metadata = &database.metadata;
            println!("✔ 総数: {}", metadata.total_foods);
            println!("  └─ 栄養データあり: {}", metadata.foods_with_nutritional_data);
            println!("  └─ FODMAPデータあり: {}", metadata.foods_with_fodmap_data);
            println!("  └─ 両方あり: {}", metadata.foods_with_complete_data);
            println!("  └─ FODMAPのみ: {}", metadata.foods_fodmap_only);
            println!("  └─ 複数食材: {}", metadata.foods_with_multiple_ingredients);
            println!(
                "  high: {} / low: {} / free: {} / なし: {}\n",
                metadata.fodmap_distribution.high,
                metadata.fodmap_distribution.low,
                metadata.fodmap_distribution.free,
                metadata.fodmap_distribution.none
            );

            println!("[3/3] 結果を保存中...");
            write_json(output, &database)?;
            println!("✔ 結果を保存: {}", output.display());

            println!("\n✅ 完了");
        }

        Commands::Tables { show } => {
            let tables = load_tables(&cli, &config)?;
            println!("辞書テーブル:");
            println!("  対訳辞書: {}件", tables.translations.len());
            println!("  食材キーワード: {}件", tables.keywords.len());

            if *show {
                let mut pairs: Vec<(&str, &str)> = tables.translations.iter().collect();
                pairs.sort();
                println!("\n対訳辞書:");
                for (english, portuguese) in pairs {
                    println!("  {} → {}", english, portuguese);
                }

                println!("\n食材キーワード:");
                for (keyword, equivalents) in tables.keywords.iter() {
                    println!("  {} → {}", keyword, equivalents.join(", "));
                }
            }
        }

        Commands::Config { set_translations, set_keywords, show } => {
            let mut config = config;

            if let Some(path) = set_translations {
                config.set_translations_path(path.clone())?;
                println!("✔ 対訳辞書を設定しました: {}", path.display());
            }

            if let Some(path) = set_keywords {
                config.set_keywords_path(path.clone())?;
                println!("✔ 食材キーワードを設定しました: {}", path.display());
            }

            if *show {
                let unset = "未設定".to_string();
                println!("設定:");
                println!(
                    "  対訳辞書: {}",
                    config
                        .translations_path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| unset.clone())
                );
                println!(
                    "  食材キーワード: {}",
                    config
                        .keywords_path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or(unset)
                );
                println!("  並列処理: {}", if config.parallel { "有効" } else { "無効" });
                println!("  ログフィルタ: {}", config.log_filter());
            }
        }
    }

    Ok(())
}
