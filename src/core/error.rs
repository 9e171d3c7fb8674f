// フレーム選択処理のエラー型定義
// 全ての失敗は致命的として扱い、リトライは行わない

use std::path::{Path, PathBuf};
use thiserror::Error;

/// 連番を持たないファイル名に対する案内文
pub const RENAME_GUIDANCE: &str = "Image name should have numbers before extension, e.g. DSCF01234.JPG. \
Please rename your files and try again (use `rename` command in *NIX).";

/// フレーム選択システム全体のエラー型
#[derive(Error, Debug)]
pub enum FramePickerError {
    #[error("設定エラー: {message}")]
    Configuration { message: String },

    #[error("ファイル名エラー: {file_name} - {}", RENAME_GUIDANCE)]
    MissingSequenceNumber { file_name: String },

    #[error("ファイル発見エラー: {path} - {source}")]
    FileDiscovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("画像読み込みエラー: {path} - {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("テンプレート照合エラー: {message}")]
    PatternLocation { message: String },

    #[error("コピーエラー: {from} -> {to} - {source}")]
    FrameCopy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("永続化エラー: {path} - {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("入力エラー: {source}")]
    Interaction {
        #[source]
        source: std::io::Error,
    },

    #[error("並列処理エラー: {message}")]
    Pipeline { message: String },

    #[error("タスクエラー: {source}")]
    Task {
        #[source]
        source: tokio::task::JoinError,
    },
}

impl FramePickerError {
    /// 設定エラーの作成
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// 連番欠落エラーの作成
    pub fn missing_sequence_number(file_name: impl Into<String>) -> Self {
        Self::MissingSequenceNumber {
            file_name: file_name.into(),
        }
    }

    /// ファイル発見エラーの作成
    pub fn file_discovery(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::FileDiscovery {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// 画像デコードエラーの作成
    pub fn image_decode(path: impl AsRef<Path>, source: image::ImageError) -> Self {
        Self::ImageDecode {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// テンプレート照合エラーの作成
    pub fn pattern_location(message: impl Into<String>) -> Self {
        Self::PatternLocation {
            message: message.into(),
        }
    }

    /// フレームコピーエラーの作成
    pub fn frame_copy(from: impl AsRef<Path>, to: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::FrameCopy {
            from: from.as_ref().to_path_buf(),
            to: to.as_ref().to_path_buf(),
            source,
        }
    }

    /// 永続化エラーの作成
    pub fn persistence(path: impl AsRef<Path>, source: anyhow::Error) -> Self {
        Self::Persistence {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// 端末入力エラーの作成
    pub fn interaction(source: std::io::Error) -> Self {
        Self::Interaction { source }
    }

    /// 並列処理エラーの作成
    pub fn pipeline(message: impl Into<String>) -> Self {
        Self::Pipeline {
            message: message.into(),
        }
    }

    /// タスクエラーの作成
    pub fn task(source: tokio::task::JoinError) -> Self {
        Self::Task { source }
    }

    /// エラーの分類を取得
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::MissingSequenceNumber { .. } => ErrorCategory::InputFormat,
            Self::FileDiscovery { .. }
            | Self::ImageDecode { .. }
            | Self::FrameCopy { .. }
            | Self::Persistence { .. }
            | Self::Interaction { .. } => ErrorCategory::Io,
            Self::PatternLocation { .. } | Self::Pipeline { .. } | Self::Task { .. } => {
                ErrorCategory::Internal
            }
        }
    }

    /// エラーコンテキストを取得
    pub fn context(&self) -> ErrorContext {
        match self {
            Self::Configuration { .. } => ErrorContext::new("configuration")
                .with_suggestion("Check the command line options (see --help)"),
            Self::MissingSequenceNumber { file_name } => ErrorContext::new("sequence_number")
                .with_resource(file_name.clone())
                .with_suggestion(RENAME_GUIDANCE),
            Self::FileDiscovery { path, .. } => ErrorContext::new("file_discovery")
                .with_resource(path.display().to_string())
                .with_suggestion("Check that the images directory exists and is readable"),
            Self::ImageDecode { path, .. } => ErrorContext::new("image_decode")
                .with_resource(path.display().to_string())
                .with_suggestion("The dataset must not contain missing or corrupt frames"),
            Self::FrameCopy { to, .. } => ErrorContext::new("frame_copy")
                .with_resource(to.display().to_string())
                .with_suggestion("Check free space and permissions of the output directory"),
            Self::Persistence { path, .. } => {
                ErrorContext::new("persistence").with_resource(path.display().to_string())
            }
            Self::Interaction { .. } => ErrorContext::new("interaction"),
            Self::PatternLocation { .. } => ErrorContext::new("pattern_location")
                .with_suggestion("Select a template region smaller than the frame"),
            Self::Pipeline { .. } | Self::Task { .. } => ErrorContext::new("parallel_matching"),
        }
    }
}

/// エラーの分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 無効なディレクトリ、範囲外のメソッド番号など
    Configuration,
    /// ファイル名に連番がない
    InputFormat,
    /// 読み込み・コピー・端末入力の失敗
    Io,
    /// ワーカーやタスクの失敗
    Internal,
}

/// エラーコンテキスト情報
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// 実行していた操作
    pub operation: String,
    /// 関連するリソース（ファイルパス等）
    pub resource: Option<String>,
    /// エラー解決のための提案
    pub suggestion: Option<String>,
}

impl ErrorContext {
    /// 新しいエラーコンテキストを作成
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            resource: None,
            suggestion: None,
        }
    }

    /// リソース情報を追加
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// 提案を追加
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// フレーム選択処理の結果型
pub type PickerResult<T> = std::result::Result<T, FramePickerError>;

impl From<tokio::task::JoinError> for FramePickerError {
    fn from(error: tokio::task::JoinError) -> Self {
        FramePickerError::Task { source: error }
    }
}
