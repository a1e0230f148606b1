// tests/common/mod.rs
//! In-memory collaborators and block builders shared by the integration tests.
#![allow(dead_code)]

use notion2md::{
    AppError, AssetStore, Block, BlockCommon, BlockId, Converter, ConverterOptions, DocumentSource,
    FileObject, ImageBlock, MalformedBlock, MarkerBlock, OverrunScope, PageId, PageSummary,
    ResolverOptions, RichTextItem, TableBlock, TableRowBlock, TextBlock, TextBlockContent,
    UnsupportedBlock,
};
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Counts calls in flight and remembers the highest count seen.
#[derive(Default)]
pub struct Gauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl Gauge {
    pub fn enter(self: &Arc<Self>) -> GaugeGuard {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        GaugeGuard(Arc::clone(self))
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

pub struct GaugeGuard(Arc<Gauge>);

impl Drop for GaugeGuard {
    fn drop(&mut self) {
        self.0.current.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A document held in memory, optionally answering after a random delay so
/// that siblings complete out of order.
#[derive(Default)]
pub struct MemorySource {
    children: HashMap<String, Vec<Block>>,
    pages: HashMap<String, PageSummary>,
    failing: HashSet<String>,
    overrun: HashSet<String>,
    max_delay_ms: u64,
    gauge: Option<Arc<Gauge>>,
    pub fetches: AtomicUsize,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_children(mut self, parent: u32, children: Vec<Block>) -> Self {
        self.children
            .insert(block_id(parent).as_str().to_string(), children);
        self
    }

    pub fn with_page(mut self, id: &str, summary: PageSummary) -> Self {
        let id = PageId::parse(id).unwrap();
        self.pages.insert(id.as_str().to_string(), summary);
        self
    }

    /// Fetching the children of `parent` fails with a transport error.
    pub fn failing(mut self, parent: u32) -> Self {
        self.failing.insert(block_id(parent).as_str().to_string());
        self
    }

    /// Fetching the children of `parent` exceeds the page cap.
    pub fn overrunning(mut self, parent: u32) -> Self {
        self.overrun.insert(block_id(parent).as_str().to_string());
        self
    }

    pub fn with_random_delays(mut self, max_delay_ms: u64) -> Self {
        self.max_delay_ms = max_delay_ms;
        self
    }

    /// Every call holds a slot on `gauge` while it runs.
    pub fn with_gauge(mut self, gauge: Arc<Gauge>) -> Self {
        self.gauge = Some(gauge);
        self
    }

    async fn jitter(&self) {
        if self.max_delay_ms == 0 {
            return;
        }
        let delay = rand::rng().random_range(0..=self.max_delay_ms);
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
}

#[async_trait::async_trait]
impl DocumentSource for MemorySource {
    async fn fetch_children(&self, block_id: &BlockId) -> Result<Vec<Block>, AppError> {
        let _in_flight = self.gauge.as_ref().map(Gauge::enter);
        self.jitter().await;
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let key = block_id.as_str();
        if self.overrun.contains(key) {
            return Err(AppError::PaginationOverrun {
                block_id: key.to_string(),
                max_pages: 100,
            });
        }
        if self.failing.contains(key) {
            return Err(AppError::Timeout {
                operation: "children fetch".to_string(),
                after: Duration::from_secs(30),
            });
        }
        Ok(self.children.get(key).cloned().unwrap_or_default())
    }

    async fn resolve_page(&self, page_id: &PageId) -> Result<PageSummary, AppError> {
        let _in_flight = self.gauge.as_ref().map(Gauge::enter);
        self.jitter().await;
        self.pages
            .get(page_id.as_str())
            .cloned()
            .ok_or_else(|| AppError::InvalidId(page_id.to_string()))
    }
}

/// Writes the URL as the file body and counts calls.
#[derive(Default)]
pub struct CountingStore {
    pub calls: AtomicUsize,
    fail: bool,
    delay_ms: u64,
    gauge: Option<Arc<Gauge>>,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn slow(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            ..Self::default()
        }
    }

    pub fn gauged(delay_ms: u64, gauge: Arc<Gauge>) -> Self {
        Self {
            delay_ms,
            gauge: Some(gauge),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AssetStore for CountingStore {
    async fn download(
        &self,
        url: &str,
        destination_dir: &Path,
        target_name: &str,
    ) -> Result<PathBuf, AppError> {
        let _in_flight = self.gauge.as_ref().map(Gauge::enter);
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
        if self.fail {
            return Err(AppError::MalformedResponse(format!("404 for {}", url)));
        }
        tokio::fs::create_dir_all(destination_dir).await?;
        let path = destination_dir.join(target_name);
        tokio::fs::write(&path, url).await?;
        Ok(path)
    }
}

pub fn converter(
    source: Arc<MemorySource>,
    store: Arc<dyn AssetStore>,
    destination_dir: &Path,
    download: bool,
) -> Converter {
    converter_with(
        source,
        store,
        destination_dir,
        download,
        ConverterOptions {
            concurrency: 4,
            call_timeout: Duration::from_secs(5),
            overrun_scope: OverrunScope::Block,
        },
    )
}

pub fn converter_with(
    source: Arc<MemorySource>,
    store: Arc<dyn AssetStore>,
    destination_dir: &Path,
    download: bool,
    options: ConverterOptions,
) -> Converter {
    Converter::new(
        source,
        store,
        ResolverOptions {
            destination_dir: destination_dir.to_path_buf(),
            link_prefix: "assets".to_string(),
            download,
            timeout: Duration::from_secs(5),
        },
        options,
    )
}

/// A converter that never downloads anything.
pub fn offline_converter(source: Arc<MemorySource>) -> Converter {
    converter(
        source,
        Arc::new(CountingStore::failing()),
        Path::new("assets"),
        false,
    )
}

// --- Block builders ---------------------------------------------------------

pub fn block_id(n: u32) -> BlockId {
    BlockId::parse(&format!("{:032x}", n)).unwrap()
}

pub fn common(n: u32, has_children: bool) -> BlockCommon {
    let common = BlockCommon::new(block_id(n));
    if has_children {
        common.with_children()
    } else {
        common
    }
}

pub fn text(n: u32, s: &str, has_children: bool) -> TextBlock {
    let rich_text = if s.is_empty() {
        Vec::new()
    } else {
        vec![RichTextItem::plain_text(s)]
    };
    TextBlock {
        common: common(n, has_children),
        content: TextBlockContent::new(rich_text),
    }
}

pub fn paragraph(n: u32, s: &str) -> Block {
    Block::Paragraph(text(n, s, false))
}

pub fn bulleted(n: u32, s: &str, has_children: bool) -> Block {
    Block::BulletedListItem(text(n, s, has_children))
}

pub fn toggle(n: u32, s: &str) -> Block {
    Block::Toggle(text(n, s, true))
}

pub fn table(n: u32, width: usize) -> Block {
    Block::Table(TableBlock {
        common: common(n, true),
        table_width: width,
        has_column_header: true,
        has_row_header: false,
    })
}

pub fn table_row(n: u32, cells: &[&str]) -> Block {
    Block::TableRow(TableRowBlock {
        common: common(n, false),
        cells: cells
            .iter()
            .map(|c| vec![RichTextItem::plain_text(c)])
            .collect(),
    })
}

pub fn column_list(n: u32) -> Block {
    Block::ColumnList(MarkerBlock {
        common: common(n, true),
    })
}

pub fn column(n: u32, has_children: bool) -> Block {
    Block::Column(MarkerBlock {
        common: common(n, has_children),
    })
}

pub fn image(n: u32, url: &str) -> Block {
    Block::Image(ImageBlock {
        common: common(n, false),
        image: FileObject::External {
            url: url.to_string(),
        },
        caption: Vec::new(),
    })
}

pub fn malformed(n: u32, tag: &str) -> Block {
    Block::Malformed(MalformedBlock {
        common: common(n, false),
        block_type: tag.to_string(),
        reason: "missing field".to_string(),
    })
}

pub fn unsupported(n: u32, tag: &str, has_children: bool) -> Block {
    Block::Unsupported(UnsupportedBlock {
        common: common(n, has_children),
        block_type: tag.to_string(),
    })
}
