//! Index writer: turns documentation pages into a search-index record.
//!
//! The writer buffers pages and API objects, analyzes page text at build
//! time, and emits a single immutable [`SearchIndexRecord`]. Pages are
//! ordered by docname so that the emitted record is deterministic for a
//! given corpus.

use std::collections::BTreeMap;
use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use log::{debug, info};

use crate::analysis::analyzer::{Analyzer, StandardAnalyzer};
use crate::error::{PharosError, Result};
use crate::record::{
    ENV_VERSION, ENV_VERSION_KEY, ObjectEntry, ObjectTypeName, Posting, SearchIndexRecord,
};

/// A single documentation page fed to the writer.
#[derive(Debug, Clone)]
pub struct Page {
    /// Stable page identifier, unique within the index.
    pub docname: String,
    /// Source file the page was generated from.
    pub filename: String,
    /// Human-readable page title.
    pub title: String,
    /// Extracted page text (no markup).
    pub body: String,
}

impl Page {
    /// Create a page with a default filename of `<docname>.md`.
    pub fn new(docname: impl Into<String>, title: impl Into<String>) -> Self {
        let docname = docname.into();
        let filename = format!("{docname}.md");
        Page {
            docname,
            filename,
            title: title.into(),
            body: String::new(),
        }
    }

    /// Set the source filename.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Set the page body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

/// An API object to be listed in the record's object inventory.
#[derive(Debug, Clone)]
pub struct ApiObject {
    /// Grouping prefix, typically a module path.
    pub prefix: String,
    /// Object name within the prefix.
    pub name: String,
    /// Type id previously interned via [`IndexWriter::register_object_type`].
    pub objtype: u32,
    /// Docname of the page documenting the object.
    pub docname: String,
    /// Page fragment identifier for deep-linking.
    pub anchor: String,
    /// Ranking tier: lower is more important; negative hides the object.
    pub priority: i8,
}

/// Index writer configuration.
#[derive(Clone)]
pub struct IndexWriterConfig {
    /// Analyzer for page bodies.
    pub analyzer: Arc<dyn Analyzer>,

    /// Analyzer for page titles.
    pub title_analyzer: Arc<dyn Analyzer>,

    /// Version tags stamped into the record's `envversion`.
    pub env_version: BTreeMap<String, u64>,
}

impl std::fmt::Debug for IndexWriterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexWriterConfig")
            .field("analyzer", &self.analyzer.name())
            .field("title_analyzer", &self.title_analyzer.name())
            .field("env_version", &self.env_version)
            .finish()
    }
}

impl Default for IndexWriterConfig {
    fn default() -> Self {
        let analyzer: Arc<dyn Analyzer> = Arc::new(StandardAnalyzer::new());
        IndexWriterConfig {
            analyzer: analyzer.clone(),
            title_analyzer: analyzer,
            env_version: BTreeMap::from([(ENV_VERSION_KEY.to_string(), ENV_VERSION)]),
        }
    }
}

/// Statistics about the build.
#[derive(Debug, Clone, Default)]
pub struct WriterStats {
    /// Number of pages indexed.
    pub pages: u64,
    /// Number of unique body terms.
    pub unique_terms: u64,
    /// Number of unique title terms.
    pub unique_title_terms: u64,
    /// Number of API objects listed.
    pub objects: u64,
}

/// Buffered object entry whose docname is resolved at build time, so
/// objects may be registered before their page is added.
#[derive(Debug, Clone)]
struct PendingObject {
    objtype: u32,
    docname: String,
    anchor: String,
    priority: i8,
}

/// Builds a [`SearchIndexRecord`] from documentation pages.
pub struct IndexWriter {
    config: IndexWriterConfig,
    pages: Vec<Page>,
    docnames_seen: AHashSet<String>,
    objects: BTreeMap<String, BTreeMap<String, PendingObject>>,
    objtypes: Vec<String>,
    objnames: Vec<ObjectTypeName>,
    objtype_ids: AHashMap<String, u32>,
}

impl std::fmt::Debug for IndexWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexWriter")
            .field("config", &self.config)
            .field("pages", &self.pages.len())
            .field("objtypes", &self.objtypes)
            .finish()
    }
}

impl IndexWriter {
    /// Create a writer with the given configuration.
    pub fn new(config: IndexWriterConfig) -> Self {
        IndexWriter {
            config,
            pages: Vec::new(),
            docnames_seen: AHashSet::new(),
            objects: BTreeMap::new(),
            objtypes: Vec::new(),
            objnames: Vec::new(),
            objtype_ids: AHashMap::new(),
        }
    }

    /// Buffer a page for indexing.
    ///
    /// Docnames must be non-empty and unique within the writer.
    pub fn add_page(&mut self, page: Page) -> Result<()> {
        if page.docname.is_empty() {
            return Err(PharosError::invalid_argument("page docname is empty"));
        }
        if !self.docnames_seen.insert(page.docname.clone()) {
            return Err(PharosError::invalid_argument(format!(
                "duplicate page docname '{}'",
                page.docname
            )));
        }
        debug!("buffered page '{}'", page.docname);
        self.pages.push(page);
        Ok(())
    }

    /// Intern an object type and return its id.
    ///
    /// Registering the same `domain:objtype` pair twice returns the
    /// existing id; the display label of the first registration wins.
    pub fn register_object_type(&mut self, domain: &str, objtype: &str, display: &str) -> u32 {
        let tag = format!("{domain}:{objtype}");
        if let Some(&id) = self.objtype_ids.get(&tag) {
            return id;
        }
        let id = self.objtypes.len() as u32;
        self.objtypes.push(tag.clone());
        self.objnames.push(ObjectTypeName {
            domain: domain.to_string(),
            objtype: objtype.to_string(),
            display: display.to_string(),
        });
        self.objtype_ids.insert(tag, id);
        id
    }

    /// Buffer an API object for the inventory.
    ///
    /// The object's docname is resolved against buffered pages at build
    /// time, so pages and objects may be added in any order.
    pub fn add_object(&mut self, object: ApiObject) -> Result<()> {
        if object.objtype as usize >= self.objtypes.len() {
            return Err(PharosError::invalid_argument(format!(
                "object type id {} is not registered",
                object.objtype
            )));
        }
        let entries = self.objects.entry(object.prefix.clone()).or_default();
        if entries.contains_key(&object.name) {
            return Err(PharosError::invalid_argument(format!(
                "duplicate object '{}.{}'",
                object.prefix, object.name
            )));
        }
        entries.insert(
            object.name,
            PendingObject {
                objtype: object.objtype,
                docname: object.docname,
                anchor: object.anchor,
                priority: object.priority,
            },
        );
        Ok(())
    }

    /// Number of pages buffered so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Analyze all buffered pages and emit the record.
    ///
    /// The writer is consumed; the emitted record is validated before it
    /// is returned.
    pub fn build(mut self) -> Result<(SearchIndexRecord, WriterStats)> {
        self.pages.sort_by(|a, b| a.docname.cmp(&b.docname));

        let mut doc_ids: AHashMap<&str, u32> = AHashMap::with_capacity(self.pages.len());
        for (idx, page) in self.pages.iter().enumerate() {
            doc_ids.insert(page.docname.as_str(), idx as u32);
        }

        let mut term_docs: AHashMap<String, Vec<u32>> = AHashMap::new();
        let mut title_term_docs: AHashMap<String, Vec<u32>> = AHashMap::new();
        for (idx, page) in self.pages.iter().enumerate() {
            let doc = idx as u32;
            for term in self.config.analyzer.analyze_terms(&page.body) {
                term_docs.entry(term).or_default().push(doc);
            }
            for term in self.config.title_analyzer.analyze_terms(&page.title) {
                title_term_docs.entry(term).or_default().push(doc);
            }
        }

        let terms = collect_postings(term_docs);
        let titleterms = collect_postings(title_term_docs);

        let mut objects: BTreeMap<String, BTreeMap<String, ObjectEntry>> = BTreeMap::new();
        let mut object_count = 0u64;
        for (prefix, entries) in self.objects {
            let mut resolved = BTreeMap::new();
            for (name, pending) in entries {
                let doc = *doc_ids.get(pending.docname.as_str()).ok_or_else(|| {
                    PharosError::not_found(format!(
                        "object '{prefix}.{name}' references unknown docname '{}'",
                        pending.docname
                    ))
                })?;
                resolved.insert(
                    name,
                    ObjectEntry {
                        doc,
                        objtype: pending.objtype,
                        priority: pending.priority,
                        anchor: pending.anchor,
                    },
                );
                object_count += 1;
            }
            objects.insert(prefix, resolved);
        }

        let stats = WriterStats {
            pages: self.pages.len() as u64,
            unique_terms: terms.len() as u64,
            unique_title_terms: titleterms.len() as u64,
            objects: object_count,
        };

        let record = SearchIndexRecord {
            docnames: self.pages.iter().map(|p| p.docname.clone()).collect(),
            envversion: self.config.env_version,
            filenames: self.pages.iter().map(|p| p.filename.clone()).collect(),
            objects,
            objnames: self.objnames,
            objtypes: self.objtypes,
            terms,
            titles: self.pages.iter().map(|p| p.title.clone()).collect(),
            titleterms,
        };
        record.validate()?;

        info!(
            "built search index: {} pages, {} terms, {} title terms, {} objects",
            stats.pages, stats.unique_terms, stats.unique_title_terms, stats.objects
        );
        Ok((record, stats))
    }
}

impl Default for IndexWriter {
    fn default() -> Self {
        Self::new(IndexWriterConfig::default())
    }
}

fn collect_postings(buffer: AHashMap<String, Vec<u32>>) -> BTreeMap<String, Posting> {
    buffer
        .into_iter()
        .filter_map(|(term, docs)| Posting::from_docs(docs).map(|p| (term, p)))
        .collect()
}
