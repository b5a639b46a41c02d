//! Access to the Polished Crystal source tree.
//!
//! Files are read and split into their variant streams here. Batches of
//! independent files are read concurrently, one spawned task per file,
//! bounded by the configured worker count.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use polished_dex_core::EncounterMethod;
use polished_dex_extract::{SplitOptions, SplitSource, split_strict, split_variants};

use crate::error::PipelineError;

/// Source files, relative to the tree root.
pub mod paths {
    pub const POKEMON_NAMES: &str = "data/pokemon/names.asm";
    pub const POKEMON_CONSTANTS: &str = "constants/pokemon_constants.asm";
    pub const BASE_STATS_DIR: &str = "data/pokemon/base_stats";
    pub const EVOS_ATTACKS: &str = "data/pokemon/evos_attacks.asm";
    pub const EGG_MOVES: &str = "data/pokemon/egg_moves.asm";
    pub const ABILITY_NAMES: &str = "data/abilities/names.asm";
    pub const ABILITY_DESCRIPTIONS: &str = "data/abilities/descriptions.asm";

    pub const MOVE_NAMES: &str = "data/moves/names.asm";
    pub const MOVE_DESCRIPTIONS: &str = "data/moves/descriptions.asm";
    pub const MOVES: &str = "data/moves/moves.asm";
    pub const TMHM_MOVES: &str = "data/moves/tmhm_moves.asm";

    pub const ITEM_ATTRIBUTES: &str = "data/items/attributes.asm";
    pub const ITEM_NAMES: &str = "data/items/names.asm";
    pub const ITEM_DESCRIPTIONS: &str = "data/items/descriptions.asm";
    pub const KEY_ITEM_NAMES: &str = "data/items/key_names.asm";
    pub const KEY_ITEM_DESCRIPTIONS: &str = "data/items/key_descriptions.asm";
    pub const MARTS: &str = "data/items/marts.asm";

    pub const PARTIES: &str = "data/trainers/parties.asm";

    pub const LANDMARK_CONSTANTS: &str = "constants/landmark_constants.asm";
    pub const MAP_ATTRIBUTES: &str = "data/maps/attributes.asm";
    pub const MAP_HEADERS: &str = "data/maps/maps.asm";
    pub const WILD_DIR: &str = "data/wild";
    pub const ROAM_MAPS: &str = "data/wild/roammon_maps.asm";
    pub const MAPS_DIR: &str = "maps";
}

/// Wild encounter files: file name, block keyword, encounter method.
pub const WILD_TABLES: &[(&str, &str, EncounterMethod)] = &[
    ("johto_grass.asm", "grass", EncounterMethod::Grass),
    ("kanto_grass.asm", "grass", EncounterMethod::Grass),
    ("orange_grass.asm", "grass", EncounterMethod::Grass),
    ("swarm_grass.asm", "grass", EncounterMethod::Grass),
    ("johto_water.asm", "water", EncounterMethod::Surfing),
    ("kanto_water.asm", "water", EncounterMethod::Surfing),
    ("orange_water.asm", "water", EncounterMethod::Surfing),
    ("swarm_water.asm", "water", EncounterMethod::Surfing),
    ("fish.asm", "fish", EncounterMethod::Fishing),
    ("treemons.asm", "tree", EncounterMethod::Headbutt),
];

/// How a file is split into variant streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    pub keep_at: bool,
    /// Reject files with an unterminated variant conditional.
    pub strict: bool,
}

impl ReadOptions {
    pub fn split_options(&self) -> SplitOptions {
        SplitOptions::new().keep_at(self.keep_at)
    }
}

/// One source file split into both variant streams.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path relative to the tree root, `/`-separated.
    pub name: String,
    /// File name without extension (`Route29`).
    pub stem: String,
    pub split: SplitSource,
}

#[derive(Debug, Clone)]
pub struct SourceTree {
    root: PathBuf,
}

impl SourceTree {
    /// Open the tree at `root`, which must be an existing directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, PipelineError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(PipelineError::SourceNotFound(root));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Display name of `path` relative to the root.
    pub fn relative_name(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// `.asm` files directly inside `relative_dir`, sorted by file name. A
    /// missing directory yields an empty list.
    pub fn list_asm(&self, relative_dir: &str) -> Vec<PathBuf> {
        let dir = self.path(relative_dir);
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Cannot list {}: {e}", dir.display());
                return Vec::new();
            }
        };
        let mut files: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "asm"))
            .collect();
        files.sort();
        files
    }

    /// Read and split one file.
    pub async fn load(&self, path: PathBuf, options: ReadOptions) -> Result<SourceFile, PipelineError> {
        let name = self.relative_name(&path);
        load_file(path, name, options).await
    }

    /// Read and split `paths` concurrently with at most `workers` reads in
    /// flight. Results come back in completion order, paired with their
    /// path.
    pub async fn load_batch(
        &self,
        paths: Vec<PathBuf>,
        options: ReadOptions,
        workers: usize,
    ) -> Vec<(PathBuf, Result<SourceFile, PipelineError>)> {
        let jobs: Vec<(PathBuf, String)> = paths
            .into_iter()
            .map(|p| {
                let name = self.relative_name(&p);
                (p, name)
            })
            .collect();

        futures::stream::iter(jobs)
            .map(|(path, name)| {
                let task_path = path.clone();
                let handle = tokio::spawn(load_file(task_path, name, options));
                async move {
                    let result = match handle.await {
                        Ok(r) => r,
                        Err(e) => Err(PipelineError::task(format!("{}: {e}", path.display()))),
                    };
                    (path, result)
                }
            })
            .buffer_unordered(workers.max(1))
            .collect()
            .await
    }
}

async fn load_file(path: PathBuf, name: String, options: ReadOptions) -> Result<SourceFile, PipelineError> {
    let text = match tokio::fs::read_to_string(&path).await {
        Ok(t) => t,
        Err(source) => return Err(PipelineError::ReadFile { path, source }),
    };
    let split = if options.strict {
        split_strict(&name, &text, options.split_options())?
    } else {
        split_variants(&name, &text, options.split_options())
    };
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    log::debug!(
        "{name}: {} polished / {} faithful lines",
        split.polished.len(),
        split.faithful.len()
    );
    Ok(SourceFile { name, stem, split })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with(files: &[(&str, &str)]) -> (tempfile::TempDir, SourceTree) {
        let dir = tempfile::tempdir().unwrap();
        for (rel, text) in files {
            let path = dir.path().join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, text).unwrap();
        }
        let tree = SourceTree::open(dir.path()).unwrap();
        (dir, tree)
    }

    #[test]
    fn open_requires_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            SourceTree::open(&missing),
            Err(PipelineError::SourceNotFound(_))
        ));
    }

    #[tokio::test]
    async fn batch_reads_every_file() {
        let (_dir, tree) = tree_with(&[
            ("maps/Route29.asm", "\tsetevent EVENT_A"),
            ("maps/Route30.asm", "if DEF(FAITHFUL)\n\tx\nelse\n\ty\nendc"),
            ("maps/notes.txt", "ignored"),
        ]);
        let paths = tree.list_asm(paths::MAPS_DIR);
        assert_eq!(paths.len(), 2);

        let mut loaded = tree.load_batch(paths, ReadOptions::default(), 2).await;
        loaded.sort_by(|a, b| a.0.cmp(&b.0));
        let files: Vec<SourceFile> = loaded.into_iter().map(|(_, r)| r.unwrap()).collect();
        assert_eq!(files[0].name, "maps/Route29.asm");
        assert_eq!(files[1].stem, "Route30");
        assert_eq!(files[1].split.polished, vec!["y"]);
        assert_eq!(files[1].split.faithful, vec!["x"]);
    }

    #[tokio::test]
    async fn strict_rejects_unterminated_blocks() {
        let (_dir, tree) = tree_with(&[("data/a.asm", "if DEF(FAITHFUL)\n\tx")]);
        let path = tree.path("data/a.asm");
        let lenient = tree.load(path.clone(), ReadOptions::default()).await.unwrap();
        assert!(lenient.split.is_unterminated());

        let strict = ReadOptions {
            strict: true,
            ..Default::default()
        };
        assert!(matches!(
            tree.load(path, strict).await,
            Err(PipelineError::Extract(_))
        ));
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let (_dir, tree) = tree_with(&[]);
        let result = tree.load(tree.path(paths::PARTIES), ReadOptions::default()).await;
        assert!(matches!(result, Err(PipelineError::ReadFile { .. })));
    }
}
