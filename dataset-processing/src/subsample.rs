//! Deterministic dev/test subsamples with contexts remapped onto a reference corpus.

use std::{collections::HashSet, path::PathBuf};

use anyhow::{Context as _, Result};
use common::{error::AppError, utils::config::AppConfig};
use rand::{seq::index, Rng};
use tracing::info;

use crate::{
    corpus::{ParagraphLookup, ReferenceCorpus},
    datasets::{DatasetKind, SetName},
    io::{read_jsonl, write_jsonl},
    records::NormalizedInstance,
};

/// Draws `sample_size` instances without replacement, skipping any whose id
/// is in `excluded_ids`. The output keeps the order in which instances were
/// drawn.
pub fn sample_instances<R: Rng + ?Sized>(
    instances: Vec<NormalizedInstance>,
    excluded_ids: &HashSet<String>,
    sample_size: usize,
    rng: &mut R,
) -> Result<Vec<NormalizedInstance>, AppError> {
    let mut pool: Vec<Option<NormalizedInstance>> = instances
        .into_iter()
        .filter(|instance| !excluded_ids.contains(&instance.question_id))
        .map(Some)
        .collect();

    if pool.len() < sample_size {
        return Err(AppError::Validation(format!(
            "sample of {sample_size} requested but only {} eligible instances remain",
            pool.len()
        )));
    }

    let picked = index::sample(rng, pool.len(), sample_size);
    Ok(picked
        .into_iter()
        .filter_map(|position| pool.get_mut(position).and_then(Option::take))
        .collect())
}

/// Rewrites every non-pinned context whose text is found in `lookup` with the
/// canonical title and text. Returns how many contexts were rewritten.
pub fn remap_contexts<L: ParagraphLookup + ?Sized>(
    instance: &mut NormalizedInstance,
    lookup: &L,
) -> usize {
    let pinned = instance.pinned_contexts.as_deref().unwrap_or(&[]);
    let mut remapped = 0;
    for context in &mut instance.contexts {
        if pinned.contains(context) {
            continue;
        }
        let Some(found) = lookup.find_matching_paragraph(&context.paragraph_text) else {
            continue;
        };
        context.title.clone_from(&found.title);
        context.paragraph_text.clone_from(&found.paragraph_text);
        remapped += 1;
    }
    remapped
}

/// Produces `<set>_subsampled.jsonl` for one dataset and returns its path.
pub fn run<R: Rng + ?Sized>(
    config: &AppConfig,
    dataset: DatasetKind,
    set: SetName,
    rng: &mut R,
) -> Result<PathBuf> {
    let input_path = dataset.processed_split_path(config, "dev");
    let instances: Vec<NormalizedInstance> = read_jsonl(&input_path)
        .with_context(|| format!("reading {} dev split", dataset.label()))?;

    let excluded_ids: HashSet<String> = match set.excluded_set() {
        Some(excluded) => {
            let excluded_path = dataset.subsampled_split_path(config, excluded);
            read_jsonl::<NormalizedInstance>(&excluded_path)
                .with_context(|| format!("reading previously drawn {excluded} sample"))?
                .into_iter()
                .map(|instance| instance.question_id)
                .collect()
        }
        None => HashSet::new(),
    };

    info!(
        dataset = %dataset,
        set = %set,
        available = instances.len(),
        excluded = excluded_ids.len(),
        sample_size = set.sample_size(),
        "Sampling instances"
    );
    let mut sampled = sample_instances(instances, &excluded_ids, set.sample_size(), rng)
        .with_context(|| format!("sampling {} {set} set", dataset.label()))?;

    let corpus = ReferenceCorpus::load(&dataset.reference_corpus_path(config))?;
    let mut remapped = 0usize;
    let mut total = 0usize;
    for instance in &mut sampled {
        total += instance.contexts.len();
        remapped += remap_contexts(instance, &corpus);
    }
    info!(remapped, total, "Remapped contexts onto reference corpus");

    let output_path = dataset.subsampled_split_path(config, set);
    write_jsonl(&sampled, &output_path)
        .with_context(|| format!("writing {} {set} sample", dataset.label()))?;
    println!(
        "[{dataset}] {} instances ({remapped}/{total} contexts remapped) → {}",
        sampled.len(),
        output_path.display()
    );

    Ok(output_path)
}
