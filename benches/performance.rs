use criterion::{black_box, criterion_group, criterion_main, Criterion};
use depscan::core::{AnalysisEngine, InputFile, Language};

fn typescript_module(index: usize, module_count: usize) -> InputFile {
    let next = (index + 1) % module_count;
    let content = format!(
        r#"
import {{ value{next} }} from "./module_{next}";
import {{ shared }} from "./shared";

export const value{index} = {index};

export function compute{index}(): number {{
    return value{next} + shared + {index};
}}

export class Handler{index} {{
    run(): number {{
        return compute{index}();
    }}
}}
"#
    );
    InputFile::new(
        format!("src/module_{index}.ts"),
        Language::TypeScript,
        content,
    )
}

fn python_module(index: usize) -> InputFile {
    let content = format!(
        r#"
from src.common import shared

LIMIT_{index} = {index}

def compute_{index}():
    return shared + LIMIT_{index}

class Worker{index}:
    def run(self):
        return compute_{index}()
"#
    );
    InputFile::new(format!("src/worker_{index}.py"), Language::Python, content)
}

fn synthetic_codebase(module_count: usize) -> Vec<InputFile> {
    let mut files = vec![
        InputFile::new(
            "src/shared.ts",
            Language::TypeScript,
            "export const shared = 42;",
        ),
        InputFile::new("src/common.py", Language::Python, "shared = 42\n"),
    ];
    for i in 0..module_count {
        files.push(typescript_module(i, module_count));
        files.push(python_module(i));
    }
    files
}

fn benchmark_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");

    let small = synthetic_codebase(10);
    group.bench_function("small_codebase", |b| {
        b.iter(|| {
            let engine = AnalysisEngine::new();
            black_box(engine.analyze(black_box(small.clone())))
        });
    });

    let large = synthetic_codebase(100);
    group.sample_size(20);
    group.bench_function("large_codebase", |b| {
        b.iter(|| {
            let engine = AnalysisEngine::new();
            black_box(engine.analyze(black_box(large.clone())))
        });
    });

    group.finish();
}

fn benchmark_extraction_only(c: &mut Criterion) {
    use depscan::extract::ExtractorFactory;

    let file = typescript_module(0, 10);
    c.bench_function("typescript_extraction", |b| {
        b.iter(|| {
            let mut extractor = ExtractorFactory::new()
                .extractor_for(Language::TypeScript)
                .unwrap();
            black_box(extractor.extract(black_box(&file.path), black_box(&file.content)))
        });
    });
}

criterion_group!(benches, benchmark_analysis, benchmark_extraction_only);
criterion_main!(benches);
