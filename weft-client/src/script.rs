//! Interpreter for the runtime calls the server embeds in markup.
//!
//! Re-rendered components carry inline `<script>` blocks. A browser simply
//! evaluates them; the Rust runtime recognizes the two calls the server
//! actually emits (`setupTimer(...)` and `checkSession(...)`) and skips
//! anything else.

use weft_api::{ComponentId, TimerSpec};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCall {
    SetupTimer { id: ComponentId, spec: TimerSpec },
    CheckSession(ComponentId),
}

/// Parse a script body into the runtime calls it contains, in order.
pub fn parse_script(src: &str) -> Vec<ScriptCall> {
    let mut cursor = Cursor { src, pos: 0 };
    let mut calls = Vec::new();
    loop {
        cursor.skip_ws_and(';');
        if cursor.at_end() {
            break;
        }
        let Some((name, args)) = cursor.call() else {
            tracing::debug!(script = src, at = cursor.pos, "unparsable script, skipping rest");
            break;
        };
        match to_call(&name, &args) {
            Some(call) => calls.push(call),
            None => tracing::debug!(function = %name, "ignoring unknown script call"),
        }
    }
    calls
}

/// Extract the bodies of all `<script>` elements in `markup`.
pub fn extract_scripts(markup: &str) -> Vec<&str> {
    let mut scripts = Vec::new();
    let mut rest = markup;
    while let Some(start) = rest.find("<script>") {
        let body = &rest[start + "<script>".len()..];
        let Some(end) = body.find("</script>") else {
            break;
        };
        scripts.push(&body[..end]);
        rest = &body[end + "</script>".len()..];
    }
    scripts
}

fn to_call(name: &str, args: &[String]) -> Option<ScriptCall> {
    match (name, args) {
        ("setupTimer", [id, js, timeout, repeat, active, reset]) => Some(ScriptCall::SetupTimer {
            id: id.parse().ok()?,
            spec: TimerSpec {
                js: js.clone(),
                timeout_ms: timeout.parse().ok()?,
                repeat: repeat.parse().ok()?,
                active: active.parse().ok()?,
                reset: reset.parse().ok()?,
            },
        }),
        ("checkSession", [id]) => Some(ScriptCall::CheckSession(id.parse().ok()?)),
        _ => None,
    }
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl Cursor<'_> {
    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws_and(&mut self, extra: char) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == extra {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn eat(&mut self, expected: char) -> Option<()> {
        self.skip_ws_and(' ');
        (self.bump()? == expected).then_some(())
    }

    fn ident(&mut self) -> Option<String> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                self.bump();
            } else {
                break;
            }
        }
        (self.pos > start).then(|| self.src[start..self.pos].to_string())
    }

    fn call(&mut self) -> Option<(String, Vec<String>)> {
        let name = self.ident()?;
        self.eat('(')?;
        let mut args = Vec::new();
        self.skip_ws_and(' ');
        if self.peek() == Some(')') {
            self.bump();
            return Some((name, args));
        }
        loop {
            args.push(self.arg()?);
            self.skip_ws_and(' ');
            match self.bump()? {
                ',' => continue,
                ')' => return Some((name, args)),
                _ => return None,
            }
        }
    }

    fn arg(&mut self) -> Option<String> {
        self.skip_ws_and(' ');
        if self.peek() == Some('"') {
            return self.string();
        }
        let start = self.pos;
        let mut depth = 0usize;
        while let Some(c) = self.peek() {
            match c {
                '(' => depth += 1,
                ')' if depth == 0 => break,
                ')' => depth -= 1,
                ',' if depth == 0 => break,
                _ => {}
            }
            self.bump();
        }
        Some(self.src[start..self.pos].trim().to_string())
    }

    fn string(&mut self) -> Option<String> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump()? {
                '"' => return Some(out),
                '\\' => out.push(self.bump()?),
                c => out.push(c),
            }
        }
    }
}
