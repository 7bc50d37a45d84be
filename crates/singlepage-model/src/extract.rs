//! Documentation extraction from a store.
//!
//! Classes are filtered and sorted by name; each class's methods are
//! filtered and bucketed into groups in first-occurrence order.

use indexmap::IndexMap;
use tracing::{debug, info, instrument, trace};

use crate::model::{ClassRecord, DocumentModel, MethodGroup, MethodRecord};
use crate::policy::ExtractPolicy;
use crate::store::{DocStore, StoreClass, StoreMethod};

/// Extract the document model from `store`.
///
/// # Errors
///
/// Store failures are returned unchanged.
#[instrument(skip_all)]
pub fn extract<S: DocStore + ?Sized>(store: &S, policy: &ExtractPolicy) -> Result<DocumentModel, S::Error> {
    let mut classes: Vec<StoreClass> = store
        .classes()?
        .into_iter()
        .filter(|class| {
            let keep = policy.includes_class(&class.full_name);
            if !keep {
                trace!(class = %class.full_name, "skipping class");
            }
            keep
        })
        .collect();

    classes.sort_by(|a, b| a.full_name.cmp(&b.full_name));

    let classes: Vec<ClassRecord> = classes
        .iter()
        .map(|class| ClassRecord {
            name: class.full_name.clone(),
            comment: class.comment.description(),
            groups: extract_groups(class, policy),
        })
        .collect();

    let model = DocumentModel { classes };
    info!(
        classes = model.classes.len(),
        methods = model.method_count(),
        "extracted documentation model"
    );
    Ok(model)
}

fn extract_groups(class: &StoreClass, policy: &ExtractPolicy) -> Vec<MethodGroup> {
    let mut groups: IndexMap<&str, Vec<MethodRecord>> = IndexMap::new();

    for method in &class.methods {
        if !policy.includes_method(&method.name) {
            trace!(class = %class.full_name, method = %method.name, "skipping method");
            continue;
        }
        let Some(group) = policy.group_of(&method.name) else {
            debug!(
                class = %class.full_name,
                method = %method.name,
                "method matches no group; leaving it out"
            );
            continue;
        };
        groups.entry(group).or_default().push(extract_method(method));
    }

    groups
        .into_iter()
        .map(|(name, methods)| MethodGroup {
            name: name.to_string(),
            methods,
        })
        .collect()
}

fn extract_method(method: &StoreMethod) -> MethodRecord {
    MethodRecord {
        name: method.name.clone(),
        comment: method.comment.description(),
        code: method.markup_code.clone(),
    }
}
