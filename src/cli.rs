use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "food-link")]
#[command(about = "栄養成分表とFODMAPリストの照合・統合ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 並列処理を無効化
    #[arg(long, global = true)]
    pub sequential: bool,

    /// 追加の対訳辞書JSON（設定ファイルより優先）
    #[arg(long, global = true)]
    pub translations: Option<PathBuf>,

    /// 追加の食材キーワードJSON（設定ファイルより優先）
    #[arg(long, global = true)]
    pub keywords: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// FODMAPリストを栄養成分表と照合して対応表を出力
    Match {
        /// FODMAPリストJSON
        #[arg(required = true)]
        foreign: PathBuf,

        /// 栄養成分表JSON
        #[arg(required = true)]
        native: PathBuf,

        /// 出力JSONファイル
        #[arg(short, long, default_value = "fodmap_equivalences.json")]
        output: PathBuf,
    },

    /// 料理名を食材に分解してFODMAP注記を出力
    Tag {
        /// FODMAPリストJSON
        #[arg(required = true)]
        foreign: PathBuf,

        /// 栄養成分表JSON
        #[arg(required = true)]
        native: PathBuf,

        /// 出力JSONファイル
        #[arg(short, long, default_value = "composite_dishes.json")]
        output: PathBuf,

        /// 複数食材の料理のみ出力
        #[arg(long)]
        only_multiple: bool,
    },

    /// 照合・分解を一括実行して統合データベースを出力
    Merge {
        /// FODMAPリストJSON
        #[arg(required = true)]
        foreign: PathBuf,

        /// 栄養成分表JSON
        #[arg(required = true)]
        native: PathBuf,

        /// 出力JSONファイル
        #[arg(short, long, default_value = "unified_food_database.json")]
        output: PathBuf,

        /// 料理名の分解を無効化
        #[arg(long)]
        no_decompose: bool,
    },

    /// 辞書テーブルを検証して概要を表示
    Tables {
        /// 全エントリを表示
        #[arg(long)]
        show: bool,
    },

    /// 設定を表示/編集
    Config {
        /// 追加の対訳辞書JSONを設定
        #[arg(long)]
        set_translations: Option<PathBuf>,

        /// 追加の食材キーワードJSONを設定
        #[arg(long)]
        set_keywords: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
