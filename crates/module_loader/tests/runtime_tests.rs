//! Integration tests for the calculator runtime

use calculators::{
    record, CalcError, CalcResult, Calculator, CalculatorId, Primitive, Record, ValidationResult,
};
use module_loader::{CalculatorRuntime, LoaderError, ModuleRegistry, RuntimeError};
use perf::{CacheStrategy, ConfigUpdate, MetricsRecorder, PerformanceConfig, SharedConfig};
use result_cache::CacheConfig;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Doubles `x` and counts how often it actually runs.
#[derive(Debug, Default)]
struct Doubler {
    computes: AtomicUsize,
}

impl Calculator for Doubler {
    fn id(&self) -> CalculatorId {
        CalculatorId::Sum
    }

    fn validate(&self, inputs: &Record) -> ValidationResult {
        if inputs.contains_key("x") {
            ValidationResult::valid()
        } else {
            ValidationResult::from_errors(vec![calculators::FieldError {
                field: "x".into(),
                message: "is required".into(),
            }])
        }
    }

    fn compute(&self, inputs: &Record) -> CalcResult<Record> {
        self.computes.fetch_add(1, Ordering::SeqCst);
        let x = calculators::number(inputs, "x")?;
        if x < 0.0 {
            return Err(CalcError::Domain("x must not be negative".into()));
        }
        Ok(record([("y", x * 2.0)]))
    }
}

fn doubler_runtime(config: SharedConfig) -> (CalculatorRuntime, Arc<Doubler>) {
    let doubler = Arc::new(Doubler::default());
    let module = Arc::clone(&doubler);
    let registry = ModuleRegistry::new().with_module("double", move || {
        let module = Arc::clone(&module);
        async move { Ok(module as Arc<dyn Calculator>) }
    });
    (CalculatorRuntime::new(registry, config), doubler)
}

fn computes(doubler: &Doubler) -> usize {
    doubler.computes.load(Ordering::SeqCst)
}

fn calculation_samples(runtime: &CalculatorRuntime) -> usize {
    runtime.recorder().samples_with_prefix("calculation_").len()
}

#[tokio::test]
async fn cache_hit_skips_compute_and_sample() {
    let (runtime, doubler) = doubler_runtime(SharedConfig::default());
    let inputs = record([("x", 21.0)]);

    let first = runtime.compute("double", &inputs).await.unwrap();
    let second = runtime.compute("double", &inputs).await.unwrap();

    assert_eq!(first["y"], Primitive::Number(42.0));
    assert_eq!(first, second);
    assert_eq!(computes(&doubler), 1);
    assert_eq!(calculation_samples(&runtime), 1);
    assert_eq!(runtime.recorder().samples()[1].label, "calculation_double");

    let stats = runtime.caches().get("double").unwrap().stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
}

#[tokio::test]
async fn field_order_does_not_change_cache_key() {
    let (runtime, doubler) = doubler_runtime(SharedConfig::default());

    runtime
        .compute("double", &record([("x", 1.0), ("unit", 0.0)]))
        .await
        .unwrap();
    runtime
        .compute("double", &record([("unit", 0.0), ("x", 1.0)]))
        .await
        .unwrap();

    assert_eq!(computes(&doubler), 1);
}

#[tokio::test]
async fn memoization_disabled_always_computes() {
    let config = SharedConfig::new(PerformanceConfig {
        enable_memoization: false,
        ..PerformanceConfig::default()
    });
    let (runtime, doubler) = doubler_runtime(config);
    let inputs = record([("x", 3.0)]);

    runtime.compute("double", &inputs).await.unwrap();
    runtime.compute("double", &inputs).await.unwrap();

    assert_eq!(computes(&doubler), 2);
    assert_eq!(calculation_samples(&runtime), 2);
    assert_eq!(runtime.caches().total_entries(), 0);
}

#[tokio::test]
async fn cache_strategy_off_is_applied_at_runtime() {
    let (runtime, doubler) = doubler_runtime(SharedConfig::default());
    let inputs = record([("x", 3.0)]);

    runtime.compute("double", &inputs).await.unwrap();
    runtime
        .config()
        .update(&ConfigUpdate::default().cache_strategy(CacheStrategy::Off));
    runtime.compute("double", &inputs).await.unwrap();

    assert_eq!(computes(&doubler), 2);
}

#[tokio::test]
async fn validation_failure_skips_compute() {
    let (runtime, doubler) = doubler_runtime(SharedConfig::default());

    let err = runtime
        .compute("double", &record([("z", 1.0)]))
        .await
        .unwrap_err();

    match err {
        RuntimeError::Validation { id, errors } => {
            assert_eq!(id, "double");
            assert_eq!(errors[0].field, "x");
        }
        other => panic!("expected validation error, got {other}"),
    }
    assert_eq!(computes(&doubler), 0);
    assert_eq!(calculation_samples(&runtime), 0);
}

#[tokio::test]
async fn compute_errors_are_not_cached() {
    let (runtime, doubler) = doubler_runtime(SharedConfig::default());
    let inputs = record([("x", -1.0)]);

    for _ in 0..2 {
        let err = runtime.compute("double", &inputs).await.unwrap_err();
        assert!(matches!(err, RuntimeError::Compute(CalcError::Domain(_))));
    }

    assert_eq!(computes(&doubler), 2);
    // Failed computations are still timed
    assert_eq!(calculation_samples(&runtime), 2);
    assert_eq!(runtime.caches().total_entries(), 0);
}

#[tokio::test(start_paused = true)]
async fn expired_result_is_recomputed() {
    let doubler = Arc::new(Doubler::default());
    let module = Arc::clone(&doubler);
    let registry = ModuleRegistry::new().with_module("double", move || {
        let module = Arc::clone(&module);
        async move { Ok(module as Arc<dyn Calculator>) }
    });
    let runtime = CalculatorRuntime::with_parts(
        registry,
        Arc::new(MetricsRecorder::new()),
        CacheConfig::with_limits(50, Duration::from_secs(60)),
    );
    let inputs = record([("x", 5.0)]);

    runtime.compute("double", &inputs).await.unwrap();
    tokio::time::advance(Duration::from_secs(59)).await;
    runtime.compute("double", &inputs).await.unwrap();
    assert_eq!(computes(&doubler), 1);

    tokio::time::advance(Duration::from_secs(2)).await;
    runtime.compute("double", &inputs).await.unwrap();
    assert_eq!(computes(&doubler), 2);
    assert_eq!(runtime.caches().get("double").unwrap().stats().stale_reads, 1);
}

#[tokio::test]
async fn clear_caches_forces_recompute() {
    let (runtime, doubler) = doubler_runtime(SharedConfig::default());
    let inputs = record([("x", 8.0)]);

    runtime.compute("double", &inputs).await.unwrap();
    runtime.clear_caches();
    runtime.compute("double", &inputs).await.unwrap();

    assert_eq!(computes(&doubler), 2);
}

#[tokio::test]
async fn unknown_calculator_is_a_loader_error() {
    let runtime = CalculatorRuntime::new(ModuleRegistry::builtin(), SharedConfig::default());

    let err = runtime
        .compute("tax-return", &Record::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RuntimeError::Loader(LoaderError::UnknownModule(ref id)) if id == "tax-return"
    ));
    assert!(runtime.recorder().is_empty());
}

#[tokio::test]
async fn lazy_loading_skips_warm_up() {
    let runtime = CalculatorRuntime::new(ModuleRegistry::builtin(), SharedConfig::default());
    assert!(runtime.warm_up().is_none());
    assert!(runtime.loader().loaded_ids().is_empty());
}

#[tokio::test]
async fn eager_loading_preloads_every_module() {
    let config = SharedConfig::default();
    config.update(&ConfigUpdate::default().enable_lazy_loading(false));
    let runtime = CalculatorRuntime::new(ModuleRegistry::builtin(), config);

    runtime.warm_up().unwrap().await.unwrap();

    assert_eq!(runtime.loader().loaded_ids().len(), CalculatorId::ALL.len());
    assert_eq!(
        runtime.recorder().samples_with_prefix("load_").len(),
        CalculatorId::ALL.len()
    );
}

#[tokio::test]
async fn report_partitions_recorded_work() {
    let runtime = CalculatorRuntime::new(ModuleRegistry::builtin(), SharedConfig::default());

    runtime
        .compute("bmi", &record([("weightKg", 70.0), ("heightCm", 175.0)]))
        .await
        .unwrap();
    runtime
        .compute("sum", &record([("a", 1.0), ("b", 2.0)]))
        .await
        .unwrap();

    let report = runtime.report();
    assert_eq!(report.sample_count, 4);
    assert_eq!(report.calculation_stats.count, 2);
    assert_eq!(report.load_stats.count, 2);
    assert_eq!(report.render_stats.count, 0);
    assert!(report.slow_calculators.is_empty());

    // Building a report records nothing
    assert_eq!(runtime.recorder().len(), 4);
}
