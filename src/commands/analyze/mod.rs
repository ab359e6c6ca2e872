use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow, bail};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::cli::{AnalyzeArgs, OcrMode};
use crate::engines::{PageRenderer, TextExtractor, TextRecognizer};
use crate::model::{Location, SourceDocument, ToolVersions};
use crate::session::{AnalysisPolicy, Session};
use crate::tokens::RawFragment;
use crate::util::{ensure_directory, sha256_file};

mod ocr;
mod poppler;
mod run;
mod tools;

pub use run::run;

use ocr::*;
use poppler::*;
use tools::*;
