// tests/member_tests.rs
//! Member accessors on the `simple_struct` scenario.


use std::collections::HashMap;

use gluegen::{MemberAccessors, OwnershipPolicy, ScopeKind};
use test_harness::{Value, session};

const FIELDS: [&str; 4] = ["int a", "float b", "bool c", "const char *text_field"];

/// Simulated native instance. Storage is addressed by the pointer
/// expressions the generated accessors hand to the converters, filled in by
/// the native constructor independently of any accessor.
struct Instance {
    memory: HashMap<String, Value>,
}

impl Instance {
    fn constructed() -> Self {
        let memory = [
            ("&_self->a", Value::Int(7)),
            ("&_self->b", Value::Float(17.5)),
            ("&_self->c", Value::Bool(true)),
            ("&_self->text_field", Value::Str("some content".into())),
        ]
        .into_iter()
        .map(|(address, value)| (address.to_string(), value))
        .collect();
        Self { memory }
    }
}

/// Runtime interpreting the accessor proxies found in generated source.
struct Runtime {
    source: String,
    /// Converter clean name to the type it converts.
    types: HashMap<String, String>,
}

/// Split `name(a, b);` into its callee and arguments.
fn split_call(call: &str) -> (&str, Vec<&str>) {
    let open = call.find('(').unwrap();
    let close = call.rfind(')').unwrap();
    (&call[..open], call[open + 1..close].split(", ").collect())
}

impl Runtime {
    /// Statements of the proxy named `proxy`.
    fn body(&self, proxy: &str) -> Vec<&str> {
        let opening = format!("{}(", proxy);
        self.source
            .lines()
            .skip_while(|line| !(line.starts_with("static ") && line.contains(&opening)))
            .skip(1)
            .take_while(|line| *line != "}")
            .map(str::trim)
            .collect()
    }

    /// Converter and pointer expression the getter reads through.
    fn getter_target(&self, getter: &str) -> (String, String) {
        let body = self.body(getter);
        let call = body
            .iter()
            .find_map(|line| line.strip_prefix("Value *rval_out = from_c_"))
            .unwrap_or_else(|| panic!("{} converts no field out", getter));
        let (clean, args) = split_call(call);
        (clean.to_string(), args[0].to_string())
    }

    /// Converter and pointer expression the setter writes through.
    fn setter_target(&self, setter: &str) -> (String, String) {
        let body = self.body(setter);
        let call = body
            .iter()
            .filter_map(|line| line.strip_prefix("to_c_"))
            .find(|call| call.contains("(args[0], "))
            .unwrap_or_else(|| panic!("{} converts no argument in", setter));
        let (clean, args) = split_call(call);
        (clean.to_string(), args[1].to_string())
    }

    fn get(&self, instance: &Instance, getter: &str) -> Value {
        let (_, address) = self.getter_target(getter);
        instance.memory[&address].clone()
    }

    fn set(&self, instance: &mut Instance, setter: &str, value: Value) -> Result<(), String> {
        let (clean, address) = self.setter_target(setter);
        if !value.satisfies(&self.types[&clean]) {
            return Err(format!("{} rejects {:?}", setter, value));
        }
        match instance.memory.get_mut(&address) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(format!("{} writes unknown location {}", setter, address)),
        }
    }
}

fn bound_struct() -> gluegen::Generator<test_harness::RecordingBackend> {
    let mut generator = session("my_test");
    generator.begin_class("simple_struct").unwrap();
    generator.bind_members("simple_struct", FIELDS).unwrap();
    generator.end_class("simple_struct").unwrap();
    generator
        .bind_function("return_simple_struct_by_pointer", "simple_struct*", Vec::<&str>::new())
        .unwrap();
    generator
}

#[test]
fn members_are_registered_in_order() {
    let generator = bound_struct();
    let registry = generator.registry();
    let conv = registry.get(registry.lookup("simple_struct").unwrap()).unwrap();
    let names: Vec<_> = conv
        .members
        .iter()
        .map(|m| m.name.clone().unwrap())
        .collect();
    assert_eq!(names, ["a", "b", "c", "text_field"]);
}

fn runtime() -> Runtime {
    let generator = bound_struct();
    let types = generator
        .registry()
        .iter()
        .map(|conv| (conv.clean_name.clone(), conv.canonical_name.clone()))
        .collect();
    let source = generator.finalize().unwrap().source;
    Runtime { source, types }
}

#[test]
fn getter_and_setter_share_the_field_address() {
    let generator = bound_struct();
    let plans: Vec<_> = FIELDS
        .iter()
        .map(|field| MemberAccessors::plan(generator.registry(), "simple_struct", field).unwrap())
        .collect();
    let runtime = runtime();

    for plan in &plans {
        let (get_conv, get_addr) = runtime.getter_target(&plan.getter);
        let (set_conv, set_addr) = runtime.setter_target(&plan.setter);
        assert_eq!(get_addr, set_addr, "{}", plan.name());
        assert_eq!(get_addr, plan.field_expr);
        assert_eq!(get_conv, set_conv);
        assert_eq!(get_addr, format!("&_self->{}", plan.name()));
    }
}

#[test]
fn read_and_write_round_trip() {
    let runtime = runtime();
    let mut instance = Instance::constructed();

    let get = |instance: &Instance, field: &str| {
        runtime.get(instance, &format!("_simple_struct_get_{}", field))
    };
    assert_eq!(get(&instance, "a"), Value::Int(7));
    assert_eq!(get(&instance, "b"), Value::Float(17.5));
    assert_eq!(get(&instance, "c"), Value::Bool(true));
    assert_eq!(get(&instance, "text_field"), Value::Str("some content".into()));

    for (field, value) in [
        ("a", Value::Int(-2)),
        ("b", Value::Float(-4.5)),
        ("c", Value::Bool(false)),
    ] {
        runtime
            .set(&mut instance, &format!("_simple_struct_set_{}", field), value)
            .unwrap();
    }

    assert_eq!(get(&instance, "a"), Value::Int(-2));
    assert_eq!(get(&instance, "b"), Value::Float(-4.5));
    assert_eq!(get(&instance, "c"), Value::Bool(false));
    assert_eq!(get(&instance, "text_field"), Value::Str("some content".into()));

    let err = runtime
        .set(&mut instance, "_simple_struct_set_a", Value::Bool(true))
        .unwrap_err();
    assert!(err.contains("rejects"), "{}", err);
    assert_eq!(get(&instance, "a"), Value::Int(-2));
}

#[test]
fn getter_ownership_follows_field_reference() {
    let generator = bound_struct();
    let registry = generator.registry();
    let policies: Vec<_> = FIELDS
        .iter()
        .map(|field| MemberAccessors::plan(registry, "simple_struct", field).unwrap().ownership)
        .collect();
    assert_eq!(
        policies,
        [
            OwnershipPolicy::Copy,
            OwnershipPolicy::Copy,
            OwnershipPolicy::Copy,
            OwnershipPolicy::NonOwning,
        ]
    );
}

#[test]
fn accessor_proxies_are_emitted() {
    let generator = bound_struct();
    {
        let scopes = generator.backend().scopes.borrow();
        let accessors: Vec<_> = scopes
            .iter()
            .filter(|s| matches!(s.kind, ScopeKind::Getter | ScopeKind::Setter))
            .map(|s| s.proxy.as_str())
            .collect();
        assert_eq!(
            accessors,
            [
                "_simple_struct_get_a",
                "_simple_struct_set_a",
                "_simple_struct_get_b",
                "_simple_struct_set_b",
                "_simple_struct_get_c",
                "_simple_struct_set_c",
                "_simple_struct_get_text_field",
                "_simple_struct_set_text_field",
            ]
        );
    }

    let output = generator.finalize().unwrap();
    let getter = "\
// get/set const char * simple_struct::text_field
static Value *_simple_struct_get_text_field(Value *self) {
\tsimple_struct * _self;
\tto_c_simple_struct(self, &_self);
\tValue *rval_out = from_c_const_char_ptr(&_self->text_field, NonOwning);
\treturn rval_out;
}
static void _simple_struct_set_text_field(Value *self, Value **args) {
\tsimple_struct * _self;
\tto_c_simple_struct(self, &_self);
\tto_c_const_char_ptr(args[0], &_self->text_field);
}
";
    assert!(output.source.contains(getter), "{}", output.source);
    assert!(output.source.contains("simple_struct * rval = return_simple_struct_by_pointer();"));
    assert!(output.source.contains("from_c_simple_struct(rval, NonOwning);"));
}
