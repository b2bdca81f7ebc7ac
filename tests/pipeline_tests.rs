//! End-to-end generation tests: IDL fixture in, files on disk out.

use assert_matches::assert_matches;
use facetgen::codegen::{ArtifactProfile, GenerationManifest, OutputLayout};
use facetgen::idl::load_schema;
use facetgen::normalize::normalize;
use facetgen::{ErrorCode, GenerateError, GeneratorConfig, SchemaError, exit_code_for, generate};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("idl")
        .join(name)
}

fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn read_all(dir: &Path) -> BTreeMap<String, String> {
    listing(dir)
        .into_iter()
        .map(|name| {
            let content = fs::read_to_string(dir.join(&name)).unwrap();
            (name, content)
        })
        .collect()
}

fn run(profile: ArtifactProfile) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("gen");
    let config = GeneratorConfig::new(fixture("Sequence.json5"), &out).with_profile(profile);
    generate(&config).unwrap();
    (tmp, out)
}

#[test]
fn minimal_profile_writes_two_files() {
    let (_tmp, out) = run(ArtifactProfile::Minimal);
    assert_eq!(listing(&out), ["ASequence.hpp", "ISequence_Xfer.hpp"]);
}

#[test]
fn routed_profile_writes_four_files() {
    let (_tmp, out) = run(ArtifactProfile::Routed);
    assert_eq!(
        listing(&out),
        ["ASequence.hpp", "ISequence_Any.hpp", "ISequence_Xfer.hpp", "RSequence.hpp"]
    );
}

#[test]
fn full_profile_writes_six_files() {
    let (_tmp, out) = run(ArtifactProfile::Full);
    assert_eq!(
        listing(&out),
        [
            "ASequence.hpp",
            "ISequence_Any.cpp",
            "ISequence_Any.hpp",
            "ISequence_Xfer.cpp",
            "ISequence_Xfer.hpp",
            "RSequence.hpp",
        ]
    );
}

#[test]
fn abstract_interface_carries_receiver_and_qualifiers() {
    let (_tmp, out) = run(ArtifactProfile::Minimal);
    let text = fs::read_to_string(out.join("ASequence.hpp")).unwrap();

    assert!(text.contains("struct ASequence {"), "{text}");
    assert!(text.contains("virtual size_type size(Copaque data) const noexcept = 0;"), "{text}");
    assert!(text.contains("virtual void push(Opaque data, int v) = 0;"), "{text}");
    assert!(text.contains("using size_type = std::size_t;"));
    assert!(text.contains("#include <cstddef>"));
    assert!(text.contains("namespace xo {"));
    assert!(text.contains("namespace scm {"));
    assert!(text.contains("struct ISequence_Impl;"));
    assert!(text.contains("Abstract sequence facet."));
}

#[test]
fn router_hides_receiver() {
    let (_tmp, out) = run(ArtifactProfile::Routed);
    let text = fs::read_to_string(out.join("RSequence.hpp")).unwrap();

    assert!(text.contains("size_type size() const noexcept {"), "{text}");
    assert!(text.contains("return O::iface()->size(O::data());"), "{text}");
    assert!(text.contains("void push(int v) {"), "{text}");
    assert!(text.contains("return O::iface()->push(O::data(), v);"), "{text}");
    assert!(text.contains("class RSequence : public Object"));
}

#[test]
fn transfer_wrapper_downcasts_receiver() {
    let (_tmp, out) = run(ArtifactProfile::Minimal);
    let text = fs::read_to_string(out.join("ISequence_Xfer.hpp")).unwrap();

    assert!(text.contains("size_type size(Copaque data) const noexcept override {"), "{text}");
    assert!(text.contains("return I::size(_dcast(data));"), "{text}");
    assert!(text.contains("return I::push(_dcast(data), v);"), "{text}");
}

#[test]
fn any_adapter_declares_unnamed_signatures() {
    let (_tmp, out) = run(ArtifactProfile::Full);
    let header = fs::read_to_string(out.join("ISequence_Any.hpp")).unwrap();
    assert!(header.contains("size_type size(Copaque) const noexcept override;"), "{header}");
    assert!(header.contains("void push(Opaque, int) override;"), "{header}");

    let body = fs::read_to_string(out.join("ISequence_Any.cpp")).unwrap();
    assert!(body.contains("#include \"ISequence_Any.hpp\""), "{body}");
}

#[test]
fn headers_record_provenance() {
    let (_tmp, out) = run(ArtifactProfile::Minimal);
    let text = fs::read_to_string(out.join("ASequence.hpp")).unwrap();
    assert!(text.contains("@file ASequence.hpp"));
    assert!(text.contains("[abstract_facet.hpp.tera]"));
    assert!(text.contains("Sequence.json5]"));
    assert!(text.contains(&format!("genfacet {}", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn missing_facet_key_is_schema_error_and_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("gen");
    let config = GeneratorConfig::new(fixture("MissingFacet.json5"), &out);

    let err = generate(&config).unwrap_err();
    assert_matches!(&err, GenerateError::Schema(SchemaError::MissingField { field }) if field == "facet");
    assert_eq!(err.code(), ErrorCode::SchemaError);
    assert!(!out.exists());
}

#[test]
fn missing_input_is_load_error() {
    let tmp = TempDir::new().unwrap();
    let config = GeneratorConfig::new(tmp.path().join("nope.json5"), tmp.path().join("gen"));
    let err = generate(&config).unwrap_err();
    assert_eq!(err.code(), ErrorCode::LoadError);
    assert_eq!(exit_code_for(&err.into()), ErrorCode::LoadError);
}

#[test]
fn output_path_that_is_a_file_is_output_error() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("gen");
    fs::write(&out, "not a directory").unwrap();

    let err = generate(&GeneratorConfig::new(fixture("Sequence.json5"), &out)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::OutputError);
    assert_eq!(fs::read_to_string(&out).unwrap(), "not a directory");
}

#[test]
fn split_layout_separates_headers_and_bodies() {
    let tmp = TempDir::new().unwrap();
    let hpp = tmp.path().join("include");
    let cpp = tmp.path().join("src");
    let mut config = GeneratorConfig::new(fixture("Sequence.json5"), tmp.path());
    config.layout = OutputLayout::Split {
        hpp_dir: hpp.clone(),
        cpp_dir: cpp.clone(),
    };

    let report = generate(&config).unwrap();
    assert_eq!(report.emit.artifacts.len(), 6);
    assert_eq!(
        listing(&hpp),
        ["ASequence.hpp", "ISequence_Any.hpp", "ISequence_Xfer.hpp", "RSequence.hpp"]
    );
    assert_eq!(listing(&cpp), ["ISequence_Any.cpp", "ISequence_Xfer.cpp"]);
}

#[test]
fn generation_is_deterministic() {
    let (_a, first) = run(ArtifactProfile::Full);
    let (_b, second) = run(ArtifactProfile::Full);
    assert_eq!(read_all(&first), read_all(&second));
}

#[test]
fn rerun_overwrites_in_place() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("gen");
    let config = GeneratorConfig::new(fixture("Sequence.json5"), &out);
    generate(&config).unwrap();
    let before = read_all(&out);
    generate(&config).unwrap();
    assert_eq!(read_all(&out), before);
}

#[test]
fn every_source_format_normalizes_identically() {
    let json5 = normalize(&load_schema(&fixture("Sequence.json5")).unwrap());
    for name in ["Sequence.yaml", "Sequence.json", "Sequence.toml"] {
        let other = normalize(&load_schema(&fixture(name)).unwrap());
        assert_eq!(json5, other, "{name}");
    }
}

#[test]
fn multi_line_docs_keep_comment_prefix() {
    let (_tmp, out) = run(ArtifactProfile::Minimal);
    let header = fs::read_to_string(out.join("ASequence.hpp")).unwrap();
    assert!(
        header.contains("     *  Abstract sequence facet.\n     *  Implementations supply size and push.\n"),
        "{header}"
    );
}

#[test]
fn repr_named_after_generated_class_fails_before_output() {
    let tmp = TempDir::new().unwrap();
    let idl = tmp.path().join("Clash.json5");
    fs::write(
        &idl,
        r#"{ facet: "Clash", namespace1: "xo", namespace2: "t", brief: "b",
             const_methods: [], nonconst_methods: [],
             reprs: [{ name: "Xfer" }, { name: "DList" }] }"#,
    )
    .unwrap();
    let out = tmp.path().join("gen");
    let mut config = GeneratorConfig::new(&idl, &out);
    config.dry_run = true;

    let err = generate(&config).unwrap_err();
    assert_matches!(
        &err,
        GenerateError::Schema(SchemaError::ReservedName { field, value })
            if field == "reprs[0].name" && value == "Xfer"
    );
    assert_eq!(err.code(), ErrorCode::SchemaError);
    assert!(!out.exists());
}

#[test]
fn representation_headers_are_generated() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("gen");
    let config = GeneratorConfig::new(fixture("Printable.json5"), &out).with_profile(ArtifactProfile::Minimal);

    let report = generate(&config).unwrap();
    assert_eq!(report.facet, "Printable");
    assert_eq!(
        listing(&out),
        [
            "APrintable.hpp",
            "IPrintable_DInteger.hpp",
            "IPrintable_DList.hpp",
            "IPrintable_Xfer.hpp",
        ]
    );

    let dlist = fs::read_to_string(out.join("IPrintable_DList.hpp")).unwrap();
    assert!(dlist.contains("#include \"xo/object2/DList.hpp\""), "{dlist}");
    assert!(dlist.contains("class IPrintable_DList {"), "{dlist}");
    assert!(
        dlist.contains("static bool pretty(const DList & self, const ppindentinfo & ppii);"),
        "{dlist}"
    );

    let abstract_header = fs::read_to_string(out.join("APrintable.hpp")).unwrap();
    assert!(abstract_header.contains("@defgroup print-printable-methods"));
    assert!(abstract_header.contains("#include <ostream>"));
    assert!(abstract_header.contains("#include \"xo/indentlog/print/ppindentinfo.hpp\""));
}

#[test]
fn dry_run_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("gen");
    let mut config = GeneratorConfig::new(fixture("Sequence.json5"), &out);
    config.dry_run = true;
    config.manifest = Some(tmp.path().join("manifest.json"));

    let report = generate(&config).unwrap();
    assert!(report.emit.dry_run);
    assert_eq!(report.emit.artifacts.len(), 6);
    assert!(report.manifest.is_none());
    assert!(!out.exists());
    assert!(!tmp.path().join("manifest.json").exists());
}

#[test]
fn manifest_matches_written_files() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("gen");
    let manifest_path = tmp.path().join("manifest.json");
    let mut config = GeneratorConfig::new(fixture("Sequence.json5"), &out);
    config.manifest = Some(manifest_path.clone());

    let report = generate(&config).unwrap();
    assert_eq!(report.manifest.as_deref(), Some(manifest_path.as_path()));

    let manifest: GenerationManifest =
        serde_json::from_str(&fs::read_to_string(&manifest_path).unwrap()).unwrap();
    assert_eq!(manifest.artifacts.len(), 6);
    assert_eq!(manifest.profile, ArtifactProfile::Full);
    assert_eq!(manifest.idl_sha256.len(), 64);
    assert!(manifest.verify().is_empty());
}

#[test]
fn template_directory_overrides_builtin() {
    let tmp = TempDir::new().unwrap();
    let templates = tmp.path().join("templates");
    fs::create_dir(&templates).unwrap();
    fs::write(
        templates.join("abstract_facet.hpp.tera"),
        "// custom {{ names.abstract_name }} from {{ template_name }}\n",
    )
    .unwrap();

    let out = tmp.path().join("gen");
    let mut config = GeneratorConfig::new(fixture("Sequence.json5"), &out).with_profile(ArtifactProfile::Minimal);
    config.template_dir = Some(templates);
    generate(&config).unwrap();

    assert_eq!(
        fs::read_to_string(out.join("ASequence.hpp")).unwrap(),
        "// custom ASequence from abstract_facet.hpp.tera\n"
    );
    let xfer = fs::read_to_string(out.join("ISequence_Xfer.hpp")).unwrap();
    assert!(xfer.contains("class ISequence_Xfer"));
}

#[test]
fn template_with_unknown_key_fails_render_and_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let templates = tmp.path().join("templates");
    fs::create_dir(&templates).unwrap();
    fs::write(templates.join("facet_router.hpp.tera"), "{{ no_such_key }}\n").unwrap();

    let out = tmp.path().join("gen");
    let mut config = GeneratorConfig::new(fixture("Sequence.json5"), &out);
    config.template_dir = Some(templates);

    let err = generate(&config).unwrap_err();
    assert_eq!(err.code(), ErrorCode::RenderError);
    assert!(!out.exists());
}
