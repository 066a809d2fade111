//! Structural validation of a search-index record.

use crate::error::{PharosError, Result};
use crate::record::{Posting, SearchIndexRecord};

impl SearchIndexRecord {
    /// Check every structural invariant of the record.
    ///
    /// Returns the first violation found:
    ///
    /// - `docnames`, `titles` and `filenames` must have equal length.
    /// - `docnames` must not contain duplicates.
    /// - `objnames` and `objtypes` must have equal length.
    /// - Every document index in `terms`, `titleterms` and `objects` must
    ///   be in bounds, and every object entry's type index must point into
    ///   `objtypes`.
    /// - Postings must be sorted and deduplicated; a multi-document
    ///   posting must hold at least two entries.
    pub fn validate(&self) -> Result<()> {
        let doc_count = self.docnames.len();

        if self.titles.len() != doc_count {
            return Err(PharosError::index(format!(
                "docnames/titles length mismatch: {} != {}",
                doc_count,
                self.titles.len()
            )));
        }
        if self.filenames.len() != doc_count {
            return Err(PharosError::index(format!(
                "docnames/filenames length mismatch: {} != {}",
                doc_count,
                self.filenames.len()
            )));
        }
        if self.objnames.len() != self.objtypes.len() {
            return Err(PharosError::index(format!(
                "objnames/objtypes length mismatch: {} != {}",
                self.objnames.len(),
                self.objtypes.len()
            )));
        }

        let mut seen = std::collections::BTreeSet::new();
        for docname in &self.docnames {
            if !seen.insert(docname) {
                return Err(PharosError::index(format!(
                    "duplicate docname '{docname}'"
                )));
            }
        }

        validate_postings("terms", &self.terms, doc_count)?;
        validate_postings("titleterms", &self.titleterms, doc_count)?;

        for (prefix, entries) in &self.objects {
            for (name, entry) in entries {
                if entry.doc as usize >= doc_count {
                    return Err(PharosError::index(format!(
                        "object '{prefix}.{name}' references document index {} \
                         but the index holds {doc_count} documents",
                        entry.doc
                    )));
                }
                if entry.objtype as usize >= self.objtypes.len() {
                    return Err(PharosError::index(format!(
                        "object '{prefix}.{name}' references type index {} \
                         but only {} object types are declared",
                        entry.objtype,
                        self.objtypes.len()
                    )));
                }
            }
        }

        Ok(())
    }
}

fn validate_postings(
    key: &str,
    postings: &std::collections::BTreeMap<String, Posting>,
    doc_count: usize,
) -> Result<()> {
    for (term, posting) in postings {
        match posting {
            Posting::One(doc) => {
                if *doc as usize >= doc_count {
                    return Err(PharosError::index(format!(
                        "{key} entry '{term}' references document index {doc} \
                         but the index holds {doc_count} documents"
                    )));
                }
            }
            Posting::Many(docs) => {
                if docs.len() < 2 {
                    return Err(PharosError::index(format!(
                        "{key} entry '{term}' holds a multi-document posting \
                         with {} entries; singletons must use the scalar form",
                        docs.len()
                    )));
                }
                // Sorted + deduplicated means strictly increasing.
                if !docs.windows(2).all(|w| w[0] < w[1]) {
                    return Err(PharosError::index(format!(
                        "{key} entry '{term}' posting is not sorted and deduplicated"
                    )));
                }
                if let Some(&last) = docs.last() {
                    if last as usize >= doc_count {
                        return Err(PharosError::index(format!(
                            "{key} entry '{term}' references document index {last} \
                             but the index holds {doc_count} documents"
                        )));
                    }
                }
            }
        }
    }
    Ok(())
}
