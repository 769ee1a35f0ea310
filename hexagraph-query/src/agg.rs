//! Aggregation functions and their registry.
//!
//! Each aggregating return element owns one context per group; the
//! executor feeds it values through [`AggContext::step`] and reads the
//! final value once traversal completes.

use hexagraph_storage::value::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

pub trait AggContext: Send {
    fn step(&mut self, value: &Value, count: usize);
    fn finalize(&self) -> Value;
}

pub type AggFactory = fn() -> Box<dyn AggContext>;

static REGISTRY: OnceLock<HashMap<&'static str, AggFactory>> = OnceLock::new();

fn registry() -> &'static HashMap<&'static str, AggFactory> {
    REGISTRY.get_or_init(|| {
        let mut funcs: HashMap<&'static str, AggFactory> = HashMap::new();
        funcs.insert("count", || Box::new(Count::default()));
        funcs.insert("sum", || Box::new(Sum::default()));
        funcs.insert("avg", || Box::new(Avg::default()));
        funcs.insert("min", || Box::new(Min::default()));
        funcs.insert("max", || Box::new(Max::default()));
        funcs
    })
}

/// Looks up an aggregation-context factory; `None` for scalar names.
pub fn get(name: &str) -> Option<AggFactory> {
    registry().get(name.to_lowercase().as_str()).copied()
}

pub fn is_aggregation(name: &str) -> bool {
    get(name).is_some()
}

#[derive(Default)]
struct Count {
    count: usize,
}

impl AggContext for Count {
    fn step(&mut self, _value: &Value, count: usize) {
        self.count += count;
    }

    fn finalize(&self) -> Value {
        Value::Number(self.count as f64)
    }
}

#[derive(Default)]
struct Sum {
    total: f64,
}

impl AggContext for Sum {
    fn step(&mut self, value: &Value, count: usize) {
        if let Some(n) = value.as_number() {
            self.total += n * count as f64;
        }
    }

    fn finalize(&self) -> Value {
        Value::Number(self.total)
    }
}

#[derive(Default)]
struct Avg {
    total: f64,
    count: usize,
}

impl AggContext for Avg {
    fn step(&mut self, value: &Value, count: usize) {
        if let Some(n) = value.as_number() {
            self.total += n * count as f64;
            self.count += count;
        }
    }

    fn finalize(&self) -> Value {
        if self.count == 0 {
            Value::Null
        } else {
            Value::Number(self.total / self.count as f64)
        }
    }
}

#[derive(Default)]
struct Min {
    min: Option<Value>,
}

impl AggContext for Min {
    fn step(&mut self, value: &Value, _count: usize) {
        if value.is_null() {
            return;
        }
        match &self.min {
            Some(current) if current.total_cmp(value).is_le() => {}
            _ => self.min = Some(value.clone()),
        }
    }

    fn finalize(&self) -> Value {
        self.min.clone().unwrap_or(Value::Null)
    }
}

#[derive(Default)]
struct Max {
    max: Option<Value>,
}

impl AggContext for Max {
    fn step(&mut self, value: &Value, _count: usize) {
        if value.is_null() {
            return;
        }
        match &self.max {
            Some(current) if current.total_cmp(value).is_ge() => {}
            _ => self.max = Some(value.clone()),
        }
    }

    fn finalize(&self) -> Value {
        self.max.clone().unwrap_or(Value::Null)
    }
}
