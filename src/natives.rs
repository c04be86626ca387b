//! Built‑in host functions, registered in the global scope of every
//! interpreter from the [`NATIVES`] table.

use std::io::{self, BufRead};

use chrono::Local;
use log::{debug, info};

use crate::interpreter::Interpreter;
use crate::value::{NativeFunction, Value};

type NativeResult = std::result::Result<Value, String>;

pub static NATIVES: &[NativeFunction] = &[
    NativeFunction {
        name: "clock",
        arity: 0,
        func: clock,
    },
    NativeFunction {
        name: "tick",
        arity: 0,
        func: tick,
    },
    NativeFunction {
        name: "read",
        arity: 0,
        func: read,
    },
    NativeFunction {
        name: "getType",
        arity: 1,
        func: get_type,
    },
    NativeFunction {
        name: "sayHi",
        arity: 1,
        func: say_hi,
    },
];

/// Local wall‑clock time as `hh:mm AM`.
fn clock(_: &mut Interpreter, _: &[Value]) -> NativeResult {
    let now: String = Local::now().format("%I:%M %p").to_string();
    info!("Native function 'clock' returned: {}", now);
    Ok(Value::String(now))
}

/// Seconds since the interpreter started.
fn tick(interpreter: &mut Interpreter, _: &[Value]) -> NativeResult {
    Ok(Value::Number(interpreter.uptime().as_secs_f64()))
}

fn read(_: &mut Interpreter, _: &[Value]) -> NativeResult {
    let mut line = String::new();

    let read: usize = io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| format!("Read error: {}", e))?;

    if read == 0 {
        return Ok(Value::Nil);
    }

    Ok(parse_input(line.trim_end_matches(['\r', '\n'])))
}

/// A number if `input` parses as one, a boolean for `true`/`false` in any
/// case, otherwise the text itself.
pub fn parse_input(input: &str) -> Value {
    if let Ok(n) = input.trim().parse::<f64>() {
        return Value::Number(n);
    }

    if input.trim().eq_ignore_ascii_case("true") {
        Value::Bool(true)
    } else if input.trim().eq_ignore_ascii_case("false") {
        Value::Bool(false)
    } else {
        Value::String(input.to_string())
    }
}

fn get_type(_: &mut Interpreter, args: &[Value]) -> NativeResult {
    let name: &str = args.first().map_or("nil", Value::type_name);
    Ok(Value::String(name.to_string()))
}

fn say_hi(interpreter: &mut Interpreter, args: &[Value]) -> NativeResult {
    let name: &Value = args.first().unwrap_or(&Value::Nil);
    debug!("Native function 'sayHi' greeting {}", name);

    writeln!(interpreter.output(), "Hello, {}", name).map_err(|e| format!("Write error: {}", e))?;
    Ok(Value::Nil)
}
