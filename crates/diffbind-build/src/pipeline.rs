use crate::{
    catalog::{MergeReport, MergedCatalog, UnitIndex, merge_snapshots, persist_snapshot},
    config::BuildConfig,
    emit::{self, Artifact, RegistryEntries},
    error::BuildError,
    synth,
};
use diffbind_core::{compare::ComparisonPlan, dispatch::DispatchTable};
use diffbind_schema::{
    ShapeError,
    decl::{Declarations, TypeDecl},
    diag::{Diagnostic, DiagnosticSink, TracingSink},
    extract::{extract_instructor, extract_model, extract_view},
    node::{ModelDescriptor, NamingDefaults},
    resolve::resolve,
    taxonomy::{PayloadVariant, payload_variants},
};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

///
/// GeneratedUnit
///
/// Everything one generation run produced for a unit.
///

#[derive(Clone, Debug, Default)]
pub struct GeneratedUnit {
    /// Text artifacts; the index file comes last.
    pub artifacts: Vec<Artifact>,
    pub index: UnitIndex,

    /// In-memory comparison plans, keyed by model key.
    pub comparison_plans: BTreeMap<String, ComparisonPlan>,

    /// In-memory dispatch tables, keyed by model key.
    pub dispatch_tables: BTreeMap<String, DispatchTable>,

    /// Declarations skipped because of a fatal shape error.
    pub skipped: Vec<ShapeError>,

    /// Phase 1 output, for units that are not the aggregator.
    pub snapshot: Option<PathBuf>,

    /// Phase 2 output, for the aggregator unit.
    pub catalog: Option<MergedCatalog>,
    pub merge: Option<MergeReport>,
}

impl GeneratedUnit {
    #[must_use]
    pub fn artifact(&self, file_name: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.file_name == file_name)
    }

    #[must_use]
    pub const fn is_aggregator(&self) -> bool {
        self.merge.is_some()
    }

    /// Fail with the first skipped declaration, if any.
    pub fn strict(self) -> Result<Self, BuildError> {
        match self.skipped.first() {
            Some(err) => Err(err.clone().into()),
            None => Ok(self),
        }
    }

    /// Write every artifact into `dir`.
    pub fn write_to(&self, dir: &Path) -> Result<(), BuildError> {
        fs::create_dir_all(dir).map_err(|e| BuildError::io(dir, e))?;

        for artifact in &self.artifacts {
            let path = dir.join(&artifact.file_name);
            fs::write(&path, &artifact.contents).map_err(|e| BuildError::io(&path, e))?;
        }

        Ok(())
    }
}

/// Run the whole pipeline for one unit: models, then instructors, then the
/// registry, then catalog Phase 2 (aggregator) or Phase 1 (everyone else).
///
/// A fatal shape error skips only its declaration. Errors returned here are
/// snapshot I/O or unparsable references in the merged catalog.
pub fn generate(
    decls: &Declarations,
    config: &BuildConfig,
    sink: &mut dyn DiagnosticSink,
) -> Result<GeneratedUnit, BuildError> {
    let mut builder = UnitBuilder::new(decls, config);

    for decl in decls.models() {
        if let Err(err) = builder.model(decl, sink) {
            builder.unit.skipped.push(err);
        }
    }

    for decl in decls.instructors() {
        if let Err(err) = builder.instructor(decl, sink) {
            builder.unit.skipped.push(err);
        }
    }

    builder.finish(decls.aggregator().is_some())
}

/// Build-script entry: load the config and the declarations file, generate,
/// and write every artifact into `out_dir`.
pub fn run(
    config_path: &Path,
    declarations_path: &Path,
    out_dir: &Path,
) -> Result<GeneratedUnit, BuildError> {
    let config = BuildConfig::load(config_path)?;

    let json = fs::read_to_string(declarations_path)
        .map_err(|e| BuildError::io(declarations_path, e))?;
    let decls = Declarations::from_json(&json).map_err(|source| BuildError::Declarations {
        path: declarations_path.to_path_buf(),
        source,
    })?;

    let unit = generate(&decls, &config, &mut TracingSink)?;
    unit.write_to(out_dir)?;

    Ok(unit)
}

///
/// UnitBuilder
///

struct UnitBuilder<'a> {
    decls: &'a Declarations,
    config: &'a BuildConfig,
    naming: NamingDefaults,
    unit: GeneratedUnit,
    models: BTreeMap<String, (ModelDescriptor, Vec<PayloadVariant>)>,
    items: BTreeMap<String, String>,
    registry: RegistryEntries,
}

impl<'a> UnitBuilder<'a> {
    fn new(decls: &'a Declarations, config: &'a BuildConfig) -> Self {
        Self {
            decls,
            config,
            naming: config.naming_defaults(),
            unit: GeneratedUnit {
                index: UnitIndex::new(&config.unit.id),
                ..GeneratedUnit::default()
            },
            models: BTreeMap::new(),
            items: BTreeMap::new(),
            registry: RegistryEntries::default(),
        }
    }

    fn model(&mut self, decl: &TypeDecl, sink: &mut dyn DiagnosticSink) -> Result<(), ShapeError> {
        let descriptor = extract_model(decl, self.decls, sink)?;
        let variants = payload_variants(&descriptor);
        let plan = synth::comparison_plan(&descriptor, &variants);

        let ctor = emit::item_name(&descriptor.key, "comparison");
        self.claim_item(&ctor, &decl.key)
            .map_err(|e| fatal(sink, e))?;
        let artifact = emit::comparison_artifact(&descriptor, &plan)
            .map_err(|e| fatal(sink, ShapeError::new(&decl.key, e.to_string())))?;

        debug!(model = %descriptor.key, variants = variants.len(), artifact = %artifact.file_name, "emitted comparison");

        let reference = self.reference(&ctor);
        self.unit.index.register_engine(&descriptor.key, reference);
        self.registry
            .engines
            .push((descriptor.key.clone(), ctor));
        self.unit.artifacts.push(artifact);
        self.unit
            .comparison_plans
            .insert(descriptor.key.clone(), plan);
        self.models
            .insert(descriptor.key.clone(), (descriptor, variants));

        Ok(())
    }

    fn instructor(
        &mut self,
        decl: &TypeDecl,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<(), ShapeError> {
        let descriptor = extract_instructor(decl, self.decls, &self.naming, sink)?;

        let Some((_, variants)) = self.models.get(&descriptor.model) else {
            return Err(fatal(
                sink,
                ShapeError::new(
                    &decl.key,
                    format!("target model `{}` was not generated", descriptor.model),
                ),
            ));
        };

        if let Some((other, _)) = self
            .unit
            .index
            .instructors
            .iter()
            .find(|(_, model)| **model == descriptor.model)
        {
            return Err(fatal(
                sink,
                ShapeError::new(
                    &decl.key,
                    format!("model `{}` is already bound by `{other}`", descriptor.model),
                ),
            ));
        }

        let view = extract_view(&descriptor, self.decls).map_err(|e| fatal(sink, e))?;
        let resolution = resolve(&descriptor, variants, &view, sink);
        let table = synth::dispatch_table(&descriptor, &resolution);

        let ctor = emit::item_name(&descriptor.model, "dispatch");
        self.claim_item(&ctor, &decl.key)
            .map_err(|e| fatal(sink, e))?;
        let artifact = emit::dispatch_artifact(&table);

        debug!(instructor = %descriptor.key, misses = resolution.misses.len(), artifact = %artifact.file_name, "emitted dispatch");

        let reference = self.reference(&ctor);
        self.unit
            .index
            .register_dispatcher(&descriptor.model, &descriptor.key, reference);
        self.registry
            .dispatchers
            .push((descriptor.model.clone(), descriptor.key.clone(), ctor));
        self.unit.artifacts.push(artifact);
        self.unit.dispatch_tables.insert(descriptor.model, table);

        Ok(())
    }

    // Two declarations whose generated items would share a name cannot both
    // be mounted in one module.
    fn claim_item(&mut self, item: &str, declaration: &str) -> Result<(), ShapeError> {
        match self.items.get(item) {
            Some(owner) if owner != declaration => Err(ShapeError::new(
                declaration,
                format!("generated item `{item}` is already used by `{owner}`"),
            )),
            _ => {
                self.items.insert(item.to_string(), declaration.to_string());
                Ok(())
            }
        }
    }

    fn reference(&self, item: &str) -> String {
        format!("{}::{item}", self.config.unit.path)
    }

    fn finish(mut self, aggregator: bool) -> Result<GeneratedUnit, BuildError> {
        self.unit
            .artifacts
            .push(emit::registry_artifact(&self.registry)?);

        let dir = &self.config.catalog.snapshot_dir;
        if aggregator {
            let (catalog, report) =
                merge_snapshots(dir, &self.unit.index, self.config.catalog.collision)?;

            self.unit.artifacts.push(emit::catalog_artifact(&catalog)?);
            self.unit.catalog = Some(catalog);
            self.unit.merge = Some(report);
        } else {
            self.unit.snapshot = Some(persist_snapshot(&self.unit.index, dir)?);
            self.unit
                .artifacts
                .push(emit::unavailable_catalog_artifact());
        }

        let index = emit::index_artifact(&self.unit.artifacts);
        self.unit.artifacts.push(index);

        debug!(
            unit = %self.unit.index.unit,
            artifacts = self.unit.artifacts.len(),
            skipped = self.unit.skipped.len(),
            "generated unit"
        );

        Ok(self.unit)
    }
}

// Report a fatal raised after extraction and hand the error back.
fn fatal(sink: &mut dyn DiagnosticSink, err: ShapeError) -> ShapeError {
    sink.report(Diagnostic::fatal(&err.declaration, &err.message));

    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::snapshot_path;
    use diffbind_core::dispatch::{Action, HandlerArg};
    use diffbind_schema::{
        decl::{Attribute, Method, Param, TypeRef, Visibility},
        diag::CollectingSink,
    };
    use tempfile::TempDir;

    fn string(name: &str) -> Param {
        Param::new(name, TypeRef::of("String"))
    }

    fn line() -> TypeDecl {
        TypeDecl::class("app::Line").constructor(vec![string("left"), string("right")])
    }

    fn picture(key: &str) -> TypeDecl {
        TypeDecl::class(key).tagged(Attribute::Model).constructor(vec![
            string("tag").tagged(Attribute::Identity),
            string("image"),
            Param::new("line", TypeRef::of("app::Line")).tagged(Attribute::Embedded),
            string("image_code").tagged(Attribute::Excluded),
            string("title"),
            Param::new("desc", TypeRef::of("String").nullable()),
            Param::new("likes", TypeRef::of("u32")),
        ])
    }

    fn view() -> TypeDecl {
        TypeDecl::class("app::PictureView")
            .method(Method::new("set_image").param("value", TypeRef::of("String")))
            .method(Method::new("set_title").param("value", TypeRef::of("String")))
    }

    fn instructor(key: &str) -> TypeDecl {
        TypeDecl::class(key)
            .tagged(Attribute::Instructor {
                model: "app::Picture".into(),
            })
            .tagged(Attribute::BindView {
                view: "app::PictureView".into(),
                prefix: None,
                bind_prefix: None,
                suffix: None,
            })
            .method(Method::new("on_likes").tagged(Attribute::BindOn {
                field: "likes".into(),
            }))
    }

    fn picture_unit() -> Vec<TypeDecl> {
        vec![
            line(),
            picture("app::Picture"),
            view(),
            instructor("app::PictureInstructor"),
        ]
    }

    fn config(dir: &TempDir, unit: &str, path: &str) -> BuildConfig {
        let mut config = BuildConfig::default();
        config.unit.id = unit.to_string();
        config.unit.path = path.to_string();
        config.catalog.snapshot_dir = dir.path().join("snapshots");

        config
    }

    fn run_unit(types: Vec<TypeDecl>, config: &BuildConfig) -> (GeneratedUnit, CollectingSink) {
        let mut sink = CollectingSink::new();
        let unit = generate(&Declarations::new(types), config, &mut sink).unwrap();

        (unit, sink)
    }

    #[test]
    fn unit_emits_every_artifact_and_persists_a_snapshot() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir, "feed", "crate::feed");

        let (unit, _) = run_unit(picture_unit(), &config);

        let names: Vec<_> = unit.artifacts.iter().map(|a| a.file_name.as_str()).collect();
        assert_eq!(
            names,
            [
                "picture_comparison.rs",
                "picture_dispatch.rs",
                emit::REGISTRY_FILE,
                emit::CATALOG_FILE,
                emit::INDEX_FILE,
            ]
        );
        assert!(unit.skipped.is_empty());
        assert!(!unit.is_aggregator());
        assert!(unit.catalog.is_none());

        let catalog = &unit.artifact(emit::CATALOG_FILE).unwrap().contents;
        assert!(catalog.contains("pub static CATALOG"), "{catalog}");
        assert!(catalog.contains("CatalogResolver :: unavailable ()"), "{catalog}");
        assert!(
            unit.artifact(emit::INDEX_FILE)
                .unwrap()
                .contents
                .contains(emit::CATALOG_FILE)
        );

        let snapshot = unit.snapshot.as_deref().unwrap();
        assert_eq!(snapshot, snapshot_path(&config.catalog.snapshot_dir, "feed"));
        assert!(snapshot.exists());

        assert_eq!(
            unit.index.engines.get("app::Picture").map(String::as_str),
            Some("crate::feed::picture_comparison")
        );
        assert_eq!(
            unit.index.instructors.get("app::PictureInstructor").map(String::as_str),
            Some("app::Picture")
        );
    }

    #[test]
    fn in_memory_outputs_follow_the_taxonomy() {
        let dir = TempDir::new().unwrap();
        let (unit, sink) = run_unit(picture_unit(), &config(&dir, "feed", "crate"));

        let plan = &unit.comparison_plans["app::Picture"];
        let variants: Vec<_> = plan.leaves().iter().map(|l| l.variant.as_str()).collect();
        assert_eq!(
            variants,
            [
                "ImageChanged",
                "TitleChanged",
                "DescChanged",
                "LikesChanged",
                "LeftInLineChanged",
                "RightInLineChanged",
            ]
        );

        let table = &unit.dispatch_tables["app::Picture"];
        assert_eq!(
            table.update_action("LikesChanged"),
            Some(&Action::handler("on_likes", HandlerArg::None))
        );
        assert_eq!(table.update_action("DescChanged"), Some(&Action::NoOp));

        // desc, left and right have neither a handler nor a setter
        assert_eq!(sink.warnings().count(), 3);
        assert!(sink.fatals().next().is_none());
    }

    #[test]
    fn invalid_model_is_skipped_without_failing_the_unit() {
        let dir = TempDir::new().unwrap();
        let mut types = picture_unit();
        types.push(
            TypeDecl::class("app::Hidden")
                .tagged(Attribute::Model)
                .with_visibility(Visibility::Private)
                .constructor(vec![string("id")]),
        );

        let (unit, sink) = run_unit(types, &config(&dir, "feed", "crate"));

        assert_eq!(unit.skipped.len(), 1);
        assert_eq!(unit.skipped[0].declaration, "app::Hidden");
        assert_eq!(sink.for_declaration("app::Hidden").count(), 1);
        assert!(unit.artifact("picture_comparison.rs").is_some());
        assert!(unit.artifact("hidden_comparison.rs").is_none());
        assert!(matches!(unit.strict(), Err(BuildError::Shape(_))));
    }

    #[test]
    fn instructor_for_a_skipped_model_is_skipped() {
        let dir = TempDir::new().unwrap();
        let broken = TypeDecl::class("app::Picture")
            .tagged(Attribute::Model)
            .abstract_()
            .constructor(vec![string("tag")]);

        let (unit, _) = run_unit(
            vec![broken, view(), instructor("app::PictureInstructor")],
            &config(&dir, "feed", "crate"),
        );

        let skipped: Vec<_> = unit.skipped.iter().map(|e| e.declaration.as_str()).collect();
        assert_eq!(skipped, ["app::Picture", "app::PictureInstructor"]);
        assert!(unit.skipped[1].message.contains("was not generated"));
        assert!(unit.dispatch_tables.is_empty());
    }

    #[test]
    fn second_instructor_for_a_model_is_skipped() {
        let dir = TempDir::new().unwrap();
        let mut types = picture_unit();
        types.push(instructor("app::OtherInstructor"));

        let (unit, sink) = run_unit(types, &config(&dir, "feed", "crate"));

        assert_eq!(unit.skipped.len(), 1);
        assert_eq!(unit.skipped[0].declaration, "app::OtherInstructor");
        assert!(unit.skipped[0].message.contains("already bound by `app::PictureInstructor`"));
        assert_eq!(sink.fatals().count(), 1);
    }

    #[test]
    fn colliding_generated_names_skip_the_later_model() {
        let dir = TempDir::new().unwrap();
        let types = vec![line(), picture("app::Picture"), picture("legacy::Picture")];

        let (unit, _) = run_unit(types, &config(&dir, "feed", "crate"));

        assert_eq!(unit.skipped.len(), 1);
        assert_eq!(unit.skipped[0].declaration, "legacy::Picture");
        assert_eq!(unit.comparison_plans.len(), 1);
    }

    #[test]
    fn aggregator_merges_pending_snapshots_into_the_catalog() {
        let dir = TempDir::new().unwrap();

        let (feed, _) = run_unit(picture_unit(), &config(&dir, "feed", "feed"));
        let feed_snapshot = feed.snapshot.unwrap();

        let avatar = TypeDecl::class("app::Avatar")
            .tagged(Attribute::Model)
            .constructor(vec![string("id"), string("url")]);
        let marker = TypeDecl::class("app::Catalog").tagged(Attribute::Catalog);
        let (app, _) = run_unit(vec![avatar, marker], &config(&dir, "app", "crate"));

        assert!(app.is_aggregator());
        assert!(app.snapshot.is_none());
        assert!(!feed_snapshot.exists());

        let catalog = app.catalog.as_ref().unwrap();
        assert_eq!(
            catalog.engine_references().into_iter().collect::<Vec<_>>(),
            [
                ("app::Avatar", "crate::avatar_comparison"),
                ("app::Picture", "feed::picture_comparison"),
            ]
        );
        assert_eq!(
            catalog.dispatcher_references().get("app::Picture").copied(),
            Some("feed::picture_dispatch")
        );

        let report = app.merge.as_ref().unwrap();
        assert_eq!(report.consumed, [feed_snapshot]);
        assert!(report.warnings.is_empty());

        let artifact = app.artifact(emit::CATALOG_FILE).unwrap();
        assert!(artifact.contents.contains("feed :: picture_comparison"));
        assert!(artifact.contents.contains("crate :: avatar_comparison"));
    }

    #[test]
    fn run_reads_inputs_and_writes_artifacts() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(crate::config::CONFIG_FILE);
        let snapshots = dir.path().join("snapshots");
        fs::write(
            &config_path,
            format!(
                "[unit]\nid = \"feed\"\n\n[catalog]\nsnapshot_dir = {:?}\n",
                snapshots.display().to_string()
            ),
        )
        .unwrap();

        let declarations = dir.path().join("declarations.json");
        fs::write(&declarations, serde_json::to_string(&picture_unit()).unwrap()).unwrap();

        let out_dir = dir.path().join("out");
        let unit = run(&config_path, &declarations, &out_dir).unwrap();

        for artifact in &unit.artifacts {
            let written = fs::read_to_string(out_dir.join(&artifact.file_name)).unwrap();
            assert_eq!(written, artifact.contents);
        }
        assert!(snapshot_path(&snapshots, "feed").exists());
    }

    #[test]
    fn run_reports_malformed_declarations() {
        let dir = TempDir::new().unwrap();
        let declarations = dir.path().join("declarations.json");
        fs::write(&declarations, "{ not json").unwrap();

        let err = run(
            &dir.path().join(crate::config::CONFIG_FILE),
            &declarations,
            &dir.path().join("out"),
        )
        .unwrap_err();

        assert!(matches!(err, BuildError::Declarations { .. }));
    }
}
