use std::cell::RefCell;
use std::path::{Path, PathBuf};

use ctm_core::{CompressionMethod, Context, Mode, VertexPrecision};
use ctm_tools::{
    describe, load_ctm, CommandRunner, ConvertOptions, Converter, ConverterRegistry, ToolError,
    ToolResult,
};
use proptest::prelude::*;

fn write_quad(path: &Path, method: CompressionMethod) {
    let mut ctx = Context::new(Mode::Export);
    ctx.define_mesh(
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
        vec![[0, 1, 2], [0, 2, 3]],
        Some(vec![[0.0, 0.0, 1.0]; 4]),
    )
    .unwrap();
    ctx.add_uv_map(
        vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
        Some("diffuse"),
        Some("quad.png"),
    )
    .unwrap();
    ctx.add_attrib_map(vec![0.5; 4], 1, Some("heat")).unwrap();
    ctx.set_file_comment(Some("quad")).unwrap();
    ctx.set_compression_method(method).unwrap();
    ctx.save_to_path(path).unwrap();
}

/// Pretends to be an external converter: records the call and writes a
/// CTM file to the output argument.
#[derive(Default)]
struct MockRunner {
    calls: RefCell<Vec<(String, Vec<String>)>>,
    fail: bool,
}

impl CommandRunner for MockRunner {
    fn run(&self, program: &str, args: &[String]) -> ToolResult<()> {
        self.calls
            .borrow_mut()
            .push((program.to_string(), args.to_vec()));
        if self.fail {
            return Err(ToolError::ConverterFailed {
                command: program.to_string(),
                message: "exit status: 1".into(),
            });
        }
        let output = args.last().map(PathBuf::from).unwrap();
        write_quad(&output, CompressionMethod::Raw);
        Ok(())
    }
}

#[test]
fn test_ctm_to_ctm_with_new_method() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.ctm");
    let output = dir.path().join("out.ctm");
    write_quad(&input, CompressionMethod::Raw);

    let registry = ConverterRegistry::new();
    let runner = MockRunner::default();
    let options = ConvertOptions {
        method: Some(CompressionMethod::Mg2),
        vertex_precision: Some(VertexPrecision::Absolute(0.01)),
        strip_attrib_maps: true,
        ..ConvertOptions::default()
    };
    let written = Converter::new(&registry, &runner)
        .convert(&input, &output, &options)
        .unwrap();
    assert!(written > 0);
    assert!(runner.calls.borrow().is_empty());

    let ctx = load_ctm(&output).unwrap();
    assert_eq!(ctx.compression_method(), CompressionMethod::Mg2);
    assert_eq!(ctx.file_comment(), Some("quad"));
    let mesh = ctx.mesh().unwrap();
    assert!(mesh.has_normals());
    assert_eq!(mesh.uv_maps()[0].file_name(), Some("quad.png"));
    assert!(mesh.attrib_maps().is_empty());
}

#[test]
fn test_foreign_format_goes_through_runner() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("model.OBJ");
    let output = dir.path().join("model.ctm");

    let mut registry = ConverterRegistry::new();
    registry.register_spec("obj=obj2ctm --in {input} {output}").unwrap();
    let runner = MockRunner::default();
    Converter::new(&registry, &runner)
        .convert(&input, &output, &ConvertOptions::default())
        .unwrap();

    let calls = runner.calls.borrow();
    assert_eq!(calls.len(), 1);
    let (program, args) = &calls[0];
    assert_eq!(program, "obj2ctm");
    assert_eq!(args[0], "--in");
    assert_eq!(Path::new(&args[1]), input.as_path());
    assert!(args[2].ends_with(".ctm"));

    let ctx = load_ctm(&output).unwrap();
    assert_eq!(ctx.compression_method(), CompressionMethod::Mg1);
}

#[test]
fn test_unknown_extension_and_failing_converter() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.ctm");
    let mut registry = ConverterRegistry::new();
    registry.register("ply", "ply2ctm {input} {output}").unwrap();

    let runner = MockRunner::default();
    let err = Converter::new(&registry, &runner)
        .convert(Path::new("mesh.stl"), &output, &ConvertOptions::default())
        .unwrap_err();
    assert!(matches!(err, ToolError::UnknownExtension(ext) if ext == "stl"));

    let failing = MockRunner {
        fail: true,
        ..MockRunner::default()
    };
    let err = Converter::new(&registry, &failing)
        .convert(Path::new("mesh.ply"), &output, &ConvertOptions::default())
        .unwrap_err();
    assert!(matches!(err, ToolError::ConverterFailed { .. }));
    assert!(!output.exists());
}

#[test]
fn test_corrupt_input_reports_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.ctm");
    std::fs::write(&input, b"XCTM\x06\0\0\0garbage").unwrap();
    let registry = ConverterRegistry::new();
    let runner = MockRunner::default();
    let err = Converter::new(&registry, &runner)
        .convert(&input, &dir.path().join("out.ctm"), &ConvertOptions::default())
        .unwrap_err();
    match err {
        ToolError::Ctm(e) => assert_eq!(e.code(), ctm_core::ErrorCode::BadFormat),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_describe_lists_maps() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quad.ctm");
    write_quad(&path, CompressionMethod::Mg2);

    let mut ctx = load_ctm(&path).unwrap();
    let report = describe(&mut ctx).unwrap();
    assert!(report.contains("Method:       MG2"));
    assert!(report.contains("Comment:      quad"));
    assert!(report.contains("Vertices:     4"));
    assert!(report.contains("Triangles:    2"));
    assert!(report.contains("Normals:      yes"));
    assert!(report.contains("diffuse (file quad.png)"));
    assert!(report.contains("heat (1 components)"));
    assert!(report.contains("Vertex step:"));
}

proptest! {
    #[test]
    fn prop_registered_extension_is_case_insensitive(
        ext in "[a-z][a-z0-9]{0,5}",
        program in "[a-z][a-z0-9_]{0,10}",
    ) {
        let mut registry = ConverterRegistry::new();
        registry.register_spec(&format!("{}={} {{input}} {{output}}", ext.to_uppercase(), program)).unwrap();
        let input = PathBuf::from(format!("mesh.{}", ext));
        let (p, args) = registry.command_for(&input, Path::new("out.ctm")).unwrap();
        prop_assert_eq!(p, program);
        prop_assert_eq!(args, vec![input.to_string_lossy().into_owned(), "out.ctm".to_string()]);
    }
}
