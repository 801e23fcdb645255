use std::{fs, hint::black_box, path::Path, time::Duration};

use criterion::{Criterion, criterion_group, criterion_main};
use jcmerge::{
    config::Config,
    imports,
    orchestrator::Merger,
    source::SourceFile,
    transformer::{self, TransformOptions},
};
use tempfile::TempDir;

const SOURCES: &str = "applet/src/main/java/opencrypto/jcmathlib";

/// A class with imports, lock calls and a locker-only region
fn synthetic_class(name: &str, methods: usize) -> String {
    let mut text = format!(
        "package opencrypto.jcmathlib;\n\nimport javacard.framework.ISOException;\nimport javacard.framework.Util;\nimport javacard.security.*;\n\npublic class {name} {{\n"
    );
    for i in 0..methods {
        text.push_str(&format!(
            "    public void op{i}(byte[] buf) {{\n        rm.lock(buf);\n        Util.arrayFillNonAtomic(buf, (short) 0, (short) {i}, (byte) 0);\n        rm.unlock(buf);\n    }}\n\n"
        ));
    }
    text.push_str("    /// [DependencyBegin:ObjectLocker]\n    public ObjectLocker locker;\n    /// [DependencyEnd:ObjectLocker]\n}\n");
    text
}

fn write_library(root: &Path, classes: usize) {
    let sources = root.join(SOURCES);
    fs::create_dir_all(sources.join("curves")).expect("Failed to create sources");
    for i in 0..classes {
        let name = format!("Class{i:03}");
        fs::write(sources.join(format!("{name}.java")), synthetic_class(&name, 40))
            .expect("Failed to write class");
    }
    fs::write(
        sources.join("curves/SecP256k1.java"),
        synthetic_class("SecP256k1", 4),
    )
    .expect("Failed to write curve");
}

fn benchmark_transform(c: &mut Criterion) {
    let file = SourceFile::new("Class000.java", &synthetic_class("Class000", 200));
    let options = TransformOptions::default();

    c.bench_function("transform_file", |b| {
        b.iter(|| transformer::transform(black_box(&file), &options));
    });
    c.bench_function("collect_imports", |b| {
        b.iter(|| imports::collect(black_box(std::slice::from_ref(&file))));
    });
}

fn benchmark_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_library");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));

    for classes in [10, 50] {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        write_library(temp_dir.path(), classes);
        let config = Config {
            version: Some("bench".to_owned()),
            ..Config::for_dir(temp_dir.path())
        };
        let merger = Merger::new(config).expect("Failed to configure merger");

        group.bench_function(format!("render_{classes}_classes"), |b| {
            b.iter(|| merger.render().expect("Failed to merge"));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_transform, benchmark_merge);
criterion_main!(benches);
