use lazy_static::lazy_static;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::Level;
use tracing_subscriber::{EnvFilter, prelude::*};
use tracing_timing::{Builder, Histogram};
use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::RwLock;
use std::time::{Duration, Instant};
use std::cell::RefCell;

// Upper bound for recorded durations: one minute in nanoseconds
const HISTOGRAM_MAX_NS: u64 = 60_000_000_000;

// Define categories for different types of operations
#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub enum OperationCategory {
    Tracking,
    Rendering {
        subcategory: RenderType,
    },
    Proximity,
    Markers,
    FileIO {
        subcategory: FileIOType,
    },
    Other,
}

#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub enum RenderType {
    FullReplay,
    Incremental,
    Export,
}

#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub enum FileIOType {
    QuestLoad,
    TrackLoad,
    ConfigLoad,
    ReportSave,
}

impl OperationCategory {
    pub fn as_str(&self) -> String {
        match self {
            OperationCategory::Tracking => "Tracking".to_string(),
            OperationCategory::Rendering { subcategory } => {
                format!("Rendering - {}", match subcategory {
                    RenderType::FullReplay => "Full Replay",
                    RenderType::Incremental => "Incremental",
                    RenderType::Export => "Export",
                })
            },
            OperationCategory::Proximity => "Proximity".to_string(),
            OperationCategory::Markers => "Markers".to_string(),
            OperationCategory::FileIO { subcategory } => {
                format!("File I/O - {}", match subcategory {
                    FileIOType::QuestLoad => "Quest Load",
                    FileIOType::TrackLoad => "Track Load",
                    FileIOType::ConfigLoad => "Config Load",
                    FileIOType::ReportSave => "Report Save",
                })
            },
            OperationCategory::Other => "Other Operations".to_string(),
        }
    }
}

thread_local! {
    static TIMING_STACK: RefCell<Vec<String>> = RefCell::new(Vec::new());
}

lazy_static! {
    static ref TIMING_ENABLED: AtomicBool = AtomicBool::new(false);
    static ref FUNCTION_TIMINGS: Arc<RwLock<HashMap<String, Histogram<u64>>>> = Arc::new(RwLock::new(HashMap::new()));
    static ref CATEGORY_TIMINGS: Arc<RwLock<HashMap<OperationCategory, Histogram<u64>>>> = Arc::new(RwLock::new(HashMap::new()));
    static ref HIERARCHICAL_TIMINGS: Arc<RwLock<HashMap<String, (Duration, usize, Vec<String>)>>> = Arc::new(RwLock::new(HashMap::new()));
}

fn new_histogram() -> Option<Histogram<u64>> {
    Histogram::<u64>::new_with_bounds(1, HISTOGRAM_MAX_NS, 3).ok()
}

pub struct TimingGuard {
    function_name: String,
    category: OperationCategory,
    start: Instant,
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        record_timing_end(&self.function_name, duration, &self.category);
    }
}

pub fn start_timing(function_name: &str, category: OperationCategory) -> TimingGuard {
    if is_timing_enabled() {
        TIMING_STACK.with(|stack| {
            stack.borrow_mut().push(function_name.to_string());
        });
    }

    TimingGuard {
        function_name: function_name.to_string(),
        category,
        start: Instant::now(),
    }
}

fn record_timing_end(function_name: &str, duration: Duration, category: &OperationCategory) {
    if !is_timing_enabled() {
        return;
    }

    let duration_ns = duration.as_nanos().min(HISTOGRAM_MAX_NS as u128) as u64;

    // Pop from timing stack and remember the caller
    TIMING_STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        if stack.pop().is_some() {
            let mut hierarchical = HIERARCHICAL_TIMINGS.write();
            let entry = hierarchical
                .entry(function_name.to_string())
                .or_insert((Duration::from_nanos(0), 0, Vec::new()));

            entry.0 += duration;
            entry.1 += 1;

            if let Some(parent_name) = stack.last() {
                if !entry.2.contains(parent_name) {
                    entry.2.push(parent_name.clone());
                }
            }
        }
    });

    {
        let mut timings = FUNCTION_TIMINGS.write();
        if !timings.contains_key(function_name) {
            if let Some(histogram) = new_histogram() {
                timings.insert(function_name.to_string(), histogram);
            }
        }
        if let Some(histogram) = timings.get_mut(function_name) {
            let _ = histogram.record(duration_ns.max(1));
        }
    }

    {
        let mut category_timings = CATEGORY_TIMINGS.write();
        if !category_timings.contains_key(category) {
            if let Some(histogram) = new_histogram() {
                category_timings.insert(category.clone(), histogram);
            }
        }
        if let Some(histogram) = category_timings.get_mut(category) {
            let _ = histogram.record(duration_ns.max(1));
        }
    }
}

pub fn init_logging(enable_timing: bool, debug_logging: bool) {
    TIMING_ENABLED.store(enable_timing, Ordering::SeqCst);

    let mut env_filter = EnvFilter::from_default_env()
        .add_directive(Level::INFO.into());
    if debug_logging {
        if let Ok(directive) = "fogquest=debug".parse() {
            env_filter = env_filter.add_directive(directive);
        }
    }

    let timing_template = if enable_timing { new_histogram() } else { None };

    let result = match timing_template {
        Some(template) => {
            let timing_layer = Builder::default().layer(move || template.clone());

            let subscriber = tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .with(timing_layer.boxed());

            tracing::subscriber::set_global_default(subscriber)
        }
        None => {
            let subscriber = tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty());

            tracing::subscriber::set_global_default(subscriber)
        }
    };

    if let Err(err) = result {
        eprintln!("Failed to set up tracing subscriber: {}", err);
    }
}

pub fn set_timing_enabled(enabled: bool) {
    TIMING_ENABLED.store(enabled, Ordering::SeqCst);
}

pub fn is_timing_enabled() -> bool {
    TIMING_ENABLED.load(Ordering::SeqCst)
}

/// Number of recorded samples for a function name; zero when unknown.
pub fn recorded_count(function_name: &str) -> u64 {
    FUNCTION_TIMINGS
        .read()
        .get(function_name)
        .map(|histogram| histogram.len())
        .unwrap_or(0)
}

pub fn print_timing_report() {
    if !is_timing_enabled() {
        return;
    }

    println!("\nDetailed Performance Report");
    println!("==========================");

    println!("\nHierarchical Timing Analysis:");
    println!("---------------------------");
    let hierarchical = HIERARCHICAL_TIMINGS.read();
    let mut entries: Vec<_> = hierarchical.iter().collect();
    entries.sort_by(|a, b| b.1.0.cmp(&a.1.0));

    for (function_name, (total_duration, count, parents)) in entries {
        let avg_duration = total_duration.div_f64((*count).max(1) as f64);
        println!(
            "{}: total={:.3}s, count={}, avg={:.3}ms{}",
            function_name,
            total_duration.as_secs_f64(),
            count,
            avg_duration.as_secs_f64() * 1000.0,
            if !parents.is_empty() {
                format!("\n  Called by: {}", parents.join(", "))
            } else {
                String::new()
            }
        );
    }

    println!("\nPerformance by Category:");
    println!("------------------------");
    let category_timings = CATEGORY_TIMINGS.read();
    let mut category_vec: Vec<_> = category_timings.iter().collect();
    category_vec.sort_by(|a, b| {
        let b_total = b.1.mean() * b.1.len() as f64;
        let a_total = a.1.mean() * a.1.len() as f64;
        b_total.partial_cmp(&a_total).unwrap_or(std::cmp::Ordering::Equal)
    });

    let total_time: f64 = category_vec.iter()
        .map(|(_, hist)| hist.mean() * (hist.len() as f64))
        .sum();

    for (category, histogram) in category_vec {
        let category_total = histogram.mean() * (histogram.len() as f64);
        let percentage = if total_time > 0.0 { (category_total / total_time) * 100.0 } else { 0.0 };
        println!(
            "{}: {:.1}% of total time\n  mean={:.3}ms, p95={:.3}ms, p99={:.3}ms, count={}",
            category.as_str(),
            percentage,
            histogram.mean() / 1_000_000.0,
            histogram.value_at_quantile(0.95) as f64 / 1_000_000.0,
            histogram.value_at_quantile(0.99) as f64 / 1_000_000.0,
            histogram.len(),
        );
    }

    println!("==========================\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_names() {
        let category = OperationCategory::Rendering { subcategory: RenderType::Incremental };
        assert_eq!(category.as_str(), "Rendering - Incremental");
        let category = OperationCategory::FileIO { subcategory: FileIOType::QuestLoad };
        assert_eq!(category.as_str(), "File I/O - Quest Load");
    }

    #[test]
    fn test_guard_records_when_enabled() {
        set_timing_enabled(true);
        {
            let _timing = start_timing("logging_test_probe", OperationCategory::Other);
        }
        assert!(recorded_count("logging_test_probe") >= 1);
    }
}
