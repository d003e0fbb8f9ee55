//! Pipeline stage isolation with a scripted toolchain.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dynexec::{
    CompileFailure, Engine, EngineError, EntryPoint, ExceptionKind, Fault, InvokeFailure, LoadFailure,
    LoadedModule, ModuleImage, ParameterSet, ResolutionError, ResolutionFailure, SemanticType,
    Stage, SynthesizedUnit, SynthesizerConfig, Toolchain, TypeTag, Value,
};
use pretty_assertions::assert_eq;

/// What the scripted entry point does when called.
#[derive(Clone)]
enum Behavior {
    /// Return the first argument, or `Void` without arguments.
    Echo,
    Throw(ExceptionKind, &'static str),
}

#[derive(Clone)]
enum Script {
    Diagnostics(Vec<&'static str>),
    Unloadable,
    NoEntryPoint,
    Entry {
        params: Vec<TypeTag>,
        behavior: Behavior,
    },
}

/// Records every stage it is asked to run.
struct Scripted {
    script: Script,
    compiles: AtomicUsize,
    loads: AtomicUsize,
    last_unit: parking_lot::Mutex<Option<String>>,
}

impl Scripted {
    fn new(script: Script) -> Self {
        Scripted {
            script,
            compiles: AtomicUsize::new(0),
            loads: AtomicUsize::new(0),
            last_unit: parking_lot::Mutex::new(None),
        }
    }
}

impl Toolchain for Scripted {
    fn compile(&self, unit: &SynthesizedUnit) -> Result<ModuleImage, CompileFailure> {
        self.compiles.fetch_add(1, Ordering::SeqCst);
        *self.last_unit.lock() = Some(unit.text().to_string());
        match &self.script {
            Script::Diagnostics(lines) => Err(CompileFailure {
                diagnostics: lines.iter().map(|l| (*l).to_string()).collect(),
            }),
            _ => Ok(ModuleImage::new(vec![1, 2, 3])),
        }
    }

    fn load(&self, image: ModuleImage) -> Result<Box<dyn LoadedModule>, LoadFailure> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        assert_eq!(image.as_bytes(), &[1, 2, 3]);
        match &self.script {
            Script::Unloadable => Err(LoadFailure {
                message: "bad image".to_string(),
            }),
            script => Ok(Box::new(ScriptedModule(script.clone()))),
        }
    }
}

struct ScriptedModule(Script);

impl LoadedModule for ScriptedModule {
    fn get_function(&self, container: &str) -> Result<Box<dyn EntryPoint + '_>, ResolutionFailure> {
        match &self.0 {
            Script::Entry { params, behavior } => Ok(Box::new(ScriptedEntry { params, behavior })),
            _ => Err(ResolutionFailure::NoPublicMethod(container.to_string())),
        }
    }
}

struct ScriptedEntry<'a> {
    params: &'a [TypeTag],
    behavior: &'a Behavior,
}

impl EntryPoint for ScriptedEntry<'_> {
    fn name(&self) -> &str {
        "Scripted"
    }

    fn param_types(&self) -> &[TypeTag] {
        self.params
    }

    fn invoke(&self, args: Vec<Value>) -> Result<Value, InvokeFailure> {
        match self.behavior {
            Behavior::Echo => Ok(args.into_iter().next().unwrap_or(Value::Void)),
            Behavior::Throw(kind, message) => Err(Fault::new(*kind, *message).into()),
        }
    }
}

fn engine(script: Script) -> Engine<Scripted> {
    Engine::with_toolchain(Scripted::new(script))
}

fn echo(params: Vec<TypeTag>) -> Script {
    Script::Entry {
        params,
        behavior: Behavior::Echo,
    }
}

fn one_param(value: &str, ty: SemanticType) -> ParameterSet {
    ParameterSet::new(vec!["p".to_string()], vec![value.to_string()], vec![ty])
}

// -- Stage gating --

#[test]
fn validation_failure_skips_compilation() {
    let engine = engine(echo(Vec::new()));
    let error = engine.execute_method("  ", &ParameterSet::none()).unwrap_err();
    assert_eq!(error.stage(), Stage::Validation);
    assert_eq!(engine.toolchain().compiles.load(Ordering::SeqCst), 0);
}

#[test]
fn compile_failure_skips_loading() {
    let engine = engine(Script::Diagnostics(vec!["first", "second", "third"]));
    let error = engine.execute_method("x", &ParameterSet::none()).unwrap_err();
    assert_eq!(error.to_string(), "compilation failed:\nfirst\nsecond\nthird");
    assert_eq!(engine.toolchain().loads.load(Ordering::SeqCst), 0);
}

#[test]
fn load_failure_is_a_resolution_error() {
    let error = engine(Script::Unloadable)
        .execute_method("x", &ParameterSet::none())
        .unwrap_err();
    assert_eq!(
        error,
        EngineError::Resolution(ResolutionError::Load(LoadFailure {
            message: "bad image".to_string()
        }))
    );
    assert_eq!(error.to_string(), "module failed to load: bad image");
}

#[test]
fn missing_entry_point() {
    let error = engine(Script::NoEntryPoint)
        .execute_method("x", &ParameterSet::none())
        .unwrap_err();
    assert_eq!(error.stage(), Stage::Resolution);
    assert_eq!(
        error.to_string(),
        "type 'DynamicMethodClass' declares no public method"
    );
}

#[test]
fn coercion_failure_skips_invocation() {
    let engine = engine(Script::Entry {
        params: vec![TypeTag::Int32],
        behavior: Behavior::Throw(ExceptionKind::Exception, "must not run"),
    });
    let error = engine
        .execute_method("x", &one_param("nope", SemanticType::Int32))
        .unwrap_err();
    assert_eq!(error.stage(), Stage::Coercion);
}

#[test]
fn faults_become_invocation_errors() {
    let engine = engine(Script::Entry {
        params: Vec::new(),
        behavior: Behavior::Throw(ExceptionKind::NotSupportedException, "nope"),
    });
    let error = engine.execute_method("x", &ParameterSet::none()).unwrap_err();
    assert_eq!(error.stage(), Stage::Invocation);
    assert_eq!(error.to_string(), "System.NotSupportedException: nope");
}

// -- Values --

#[test]
fn coerced_values_reach_the_entry_point() {
    let engine = engine(echo(vec![TypeTag::Double]));
    assert_eq!(
        engine.execute_method("x", &one_param("2.5", SemanticType::Double)),
        Ok(Value::Double(2.5))
    );
    assert_eq!(
        engine.execute_method("x", &one_param("q", SemanticType::Char)),
        Ok(Value::Char('q'))
    );
}

#[test]
fn absent_parameters_invoke_without_arguments() {
    let engine = engine(echo(Vec::new()));
    assert_eq!(
        engine.execute_method("x", &ParameterSet::none()),
        Ok(Value::Void)
    );
}

// -- Template --

#[test]
fn body_is_wrapped_in_the_template() {
    let engine = engine(echo(Vec::new()));
    engine.execute_method("BODY", &ParameterSet::none()).unwrap();
    let unit = engine.toolchain().last_unit.lock().clone().unwrap();
    assert_eq!(
        unit,
        "using System;\nusing System.Text;\npublic class DynamicMethodClass {\n\tBODY\n}"
    );
}

#[test]
fn per_call_config() {
    let engine = engine(echo(Vec::new()));
    let config = SynthesizerConfig::default()
        .with_container("Isolated")
        .with_imports(Vec::<String>::new());
    engine
        .execute_method_with(&config, "BODY", &ParameterSet::none())
        .unwrap();
    let unit = engine.toolchain().last_unit.lock().clone().unwrap();
    assert_eq!(unit, "public class Isolated {\n\tBODY\n}");
}

// -- Concurrency --

#[test]
fn concurrent_calls_share_one_engine() {
    let engine = Arc::new(engine(echo(vec![TypeTag::Int32])));
    let handles: Vec<_> = (0..8)
        .map(|n| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                engine.execute_method("x", &one_param(&n.to_string(), SemanticType::Int32))
            })
        })
        .collect();
    for (n, handle) in handles.into_iter().enumerate() {
        let expected = i32::try_from(n).unwrap();
        assert_eq!(handle.join().unwrap(), Ok(Value::Int32(expected)));
    }
    assert_eq!(engine.toolchain().compiles.load(Ordering::SeqCst), 8);
}
