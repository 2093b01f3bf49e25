//! JavaScript rendition of the client runtime.
//!
//! Every protocol constant is spliced in from `weft_api`, so the script and
//! the server can only disagree if they were built from different versions
//! (and the resource name carries the version for that reason).

use weft_api::protocol::{AppPaths, classes, codes, params};
use weft_api::{ComponentId, ModKeys};

/// Per-page variables the runtime reads: endpoint paths and the initial
/// focus target. Emitted inline before the runtime script is loaded.
pub fn page_globals(paths: &AppPaths, focused: Option<ComponentId>) -> String {
    let focused = focused.map_or_else(|| "null".to_string(), |id| format!("'{}'", id));
    format!(
        "var _pathApp='{}',_pathEvent='{}',_pathRenderComp='{}',_pathSessCheck='{}',_focCompId={};",
        js_str(&paths.app),
        js_str(&paths.event),
        js_str(&paths.render_comp),
        js_str(&paths.session_check),
        focused
    )
}

fn js_str(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

/// The static runtime script served under `_static/`.
pub fn runtime_js() -> String {
    let mut js = String::with_capacity(RUNTIME_BODY.len() + 512);
    js.push_str(&format!(
        "var _pEventType='{}',_pCompId='{}',_pCompValue='{}',_pFocCompId='{}',\
         _pMouseWX='{}',_pMouseWY='{}',_pMouseX='{}',_pMouseY='{}',\
         _pMouseBtn='{}',_pModKeys='{}',_pKeyCode='{}';\n",
        params::EVENT_TYPE,
        params::COMP_ID,
        params::COMP_VALUE,
        params::FOCUSED_COMP_ID,
        params::MOUSE_WX,
        params::MOUSE_WY,
        params::MOUSE_X,
        params::MOUSE_Y,
        params::MOUSE_BTN,
        params::MOD_KEYS,
        params::KEY_CODE,
    ));
    js.push_str(&format!(
        "var _modKeyAlt={},_modKeyCtrl={},_modKeyMeta={},_modKeyShift={};\n",
        ModKeys::ALT.bits(),
        ModKeys::CTRL.bits(),
        ModKeys::META.bits(),
        ModKeys::SHIFT.bits(),
    ));
    js.push_str(&format!(
        "var _eraNoAction={},_eraReloadWin={},_eraDirtyComps={},_eraFocusComp={};\n",
        codes::NO_ACTION,
        codes::RELOAD_WINDOW,
        codes::MARK_DIRTY,
        codes::FOCUS_COMPONENT,
    ));
    js.push_str(&format!(
        "var _clsSessMonitorExpired='{}';\n",
        classes::SESSION_MONITOR_EXPIRED
    ));
    js.push_str(RUNTIME_BODY);
    js
}

const RUNTIME_BODY: &str = r#"
function param(name, value) {
	return "&" + name + "=" + encodeURIComponent(value);
}

function focusedId() {
	var e = document.activeElement;
	return e && e.id ? e.id : null;
}

// Send event (asynchronous)
function se(event, etype, compId, compValue) {
	var xhr = new XMLHttpRequest();
	xhr.onreadystatechange = function() {
		if (xhr.readyState == 4 && xhr.status == 200)
			procEresp(xhr.responseText);
	};
	xhr.open("POST", _pathEvent, true);
	xhr.setRequestHeader("Content-type", "application/x-www-form-urlencoded");

	var data = param(_pEventType, etype) + param(_pCompId, compId);
	if (compValue != null)
		data += param(_pCompValue, compValue);
	var foc = focusedId();
	if (foc != null)
		data += param(_pFocCompId, foc);

	if (event != null) {
		if (event.clientX != null) {
			var x = event.clientX, y = event.clientY;
			data += param(_pMouseWX, x) + param(_pMouseWY, y);
			var parent = document.getElementById(compId);
			while (parent) {
				x -= parent.offsetLeft;
				y -= parent.offsetTop;
				parent = parent.offsetParent;
			}
			data += param(_pMouseX, x) + param(_pMouseY, y);
			data += param(_pMouseBtn, event.button < 4 ? event.button : 1);
		}

		var modKeys = 0;
		if (event.altKey) modKeys |= _modKeyAlt;
		if (event.ctrlKey) modKeys |= _modKeyCtrl;
		if (event.metaKey) modKeys |= _modKeyMeta;
		if (event.shiftKey) modKeys |= _modKeyShift;
		data += param(_pModKeys, modKeys);
		var kc = event.which ? event.which : event.keyCode;
		if (kc != null)
			data += param(_pKeyCode, kc);
	}

	xhr.send(data.substring(1));
}

// Apply an event response: directives in order
function procEresp(text) {
	if (text.length == 0) {
		window.alert("No response received!");
		return;
	}
	var actions = text.split(";");
	for (var i = 0; i < actions.length; i++) {
		var n = actions[i].split(",");
		switch (parseInt(n[0])) {
		case _eraDirtyComps:
			for (var j = 1; j < n.length; j++)
				rerenderComp(n[j]);
			break;
		case _eraFocusComp:
			if (n.length > 1)
				focusComp(n[1]);
			break;
		case _eraNoAction:
			break;
		case _eraReloadWin:
			if (n.length > 1 && n[1].length > 0) {
				var path = decodeURIComponent(n[1]);
				window.location.href = path.charAt(0) == "/" ? path : _pathApp + path;
			} else
				window.location.reload();
			break;
		default:
			window.alert("Unknown response code:" + n[0]);
			break;
		}
	}
}

// Re-render a component (synchronous)
function rerenderComp(compId) {
	var e = document.getElementById(compId);
	if (!e)
		return;

	var xhr = new XMLHttpRequest();
	xhr.open("POST", _pathRenderComp, false);
	xhr.setRequestHeader("Content-type", "application/x-www-form-urlencoded");
	xhr.send(_pCompId + "=" + encodeURIComponent(compId));
	if (xhr.status != 200 || xhr.responseText.length == 0)
		return;

	var focused = focusedId();
	e.outerHTML = xhr.responseText;
	focusComp(focused != null ? focused : _focCompId);

	// Inserted scripts are not run by the browser, run them here.
	var fresh = document.getElementById(compId);
	if (!fresh)
		return;
	var scripts = fresh.getElementsByTagName("script");
	for (var i = 0; i < scripts.length; i++)
		eval(scripts[i].text);
}

// Selected indices of a select element, comma separated
function selIdxs(select) {
	var selected = "";
	for (var i = 0; i < select.options.length; i++)
		if (select.options[i].selected)
			selected += i + ",";
	return selected;
}

function focusComp(compId) {
	if (compId != null) {
		var e = document.getElementById(compId);
		if (e)
			e.focus();
	}
}

function addonload(func) {
	var old = window.onload;
	if (typeof old != "function")
		window.onload = func;
	else
		window.onload = function() { old(); func(); };
}

function addonbeforeunload(func) {
	var old = window.onbeforeunload;
	if (typeof old != "function")
		window.onbeforeunload = func;
	else
		window.onbeforeunload = function() { old(); func(); };
}

// One timer per component id
var timers = {};

function clearTimer(compId) {
	var timer = timers[compId];
	if (timer == null)
		return;
	if (timer.repeat)
		clearInterval(timer.id);
	else
		clearTimeout(timer.id);
	delete timers[compId];
}

function setupTimer(compId, js, timeout, repeat, active, reset) {
	var timer = timers[compId];
	if (timer != null) {
		var changed = timer.js != js || timer.timeout != timeout || timer.repeat != repeat || timer.reset != reset;
		if (!active || changed)
			clearTimer(compId);
		if (!changed)
			return;
	}
	if (!active)
		return;

	timer = {js: js, timeout: timeout, repeat: repeat, reset: reset};
	timer.id = repeat ? setInterval(js, timeout) : setTimeout(js, timeout);
	timers[compId] = timer;
}

function teardownTimers() {
	for (var compId in timers)
		clearTimer(compId);
}

// Session check (synchronous)
function checkSession(compId) {
	var e = document.getElementById(compId);
	if (!e)
		return;

	var xhr = new XMLHttpRequest();
	xhr.open("GET", _pathSessCheck, false);
	xhr.send();
	if (xhr.status != 200)
		return;

	var secs = parseFloat(xhr.responseText);
	if (secs < 0) {
		e.classList.add(_clsSessMonitorExpired);
		e.children[0].innerText = "Expired!";
	} else {
		e.classList.remove(_clsSessMonitorExpired);
		if (secs < 60)
			e.children[0].innerText = "<1 min";
		else
			e.children[0].innerText = "~" + Math.round(secs / 60) + " min";
	}
}

addonload(function() {
	focusComp(_focCompId);
});
addonbeforeunload(teardownTimers);
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_are_spliced_in() {
        let js = runtime_js();
        assert!(js.starts_with("var _pEventType='et',_pCompId='cid',_pCompValue='cval'"));
        assert!(js.contains("_modKeyAlt=1,_modKeyCtrl=2,_modKeyMeta=4,_modKeyShift=8;"));
        assert!(js.contains("_eraNoAction=0,_eraReloadWin=1,_eraDirtyComps=2,_eraFocusComp=3;"));
        assert!(js.contains("'weft-SessMonitor-Expired'"));
        assert!(js.contains("function setupTimer(compId, js, timeout, repeat, active, reset)"));
    }

    fn function_body<'a>(js: &'a str, name: &str) -> &'a str {
        let start = js
            .find(&format!("function {}(", name))
            .unwrap_or_else(|| panic!("{} missing", name));
        let rest = &js[start..];
        let end = rest.find("\n}\n").map_or(rest.len(), |i| i + 3);
        &rest[..end]
    }

    #[test]
    fn response_processing_matches_the_native_runtime() {
        let js = runtime_js();
        let body = function_body(&js, "procEresp");
        assert!(body.contains("if (text.length == 0)"));
        assert!(body.contains("window.alert(\"No response received!\");"));
        assert!(body.contains("var path = decodeURIComponent(n[1]);"));
        assert!(body.contains("path.charAt(0) == \"/\" ? path : _pathApp + path"));
        assert!(body.contains("window.alert(\"Unknown response code:\" + n[0]);"));
        let dirty = body.find("case _eraDirtyComps").unwrap();
        let focus = body.find("case _eraFocusComp").unwrap();
        let reload = body.find("case _eraReloadWin").unwrap();
        assert!(dirty < focus && focus < reload);
    }

    #[test]
    fn timer_setup_clears_before_reinstalling() {
        let js = runtime_js();
        let body = function_body(&js, "setupTimer");
        assert!(body.contains(
            "timer.js != js || timer.timeout != timeout || timer.repeat != repeat || timer.reset != reset"
        ));
        let clear = body.find("clearTimer(compId);").unwrap();
        let install = body.find("setInterval(js, timeout)").unwrap();
        assert!(clear < install);
        assert!(body.contains("if (!changed)\n\t\t\treturn;"));

        let teardown = function_body(&js, "teardownTimers");
        assert!(teardown.contains("clearTimer(compId);"));
        assert!(js.contains("addonbeforeunload(teardownTimers);"));
    }

    #[test]
    fn session_check_labels_match_status() {
        let js = runtime_js();
        let body = function_body(&js, "checkSession");
        assert!(body.contains("xhr.open(\"GET\", _pathSessCheck, false);"));
        assert!(body.contains("if (secs < 0) {"));
        assert!(body.contains("classList.add(_clsSessMonitorExpired)"));
        assert!(body.contains(&format!("\"{}\"", crate::SessionStatus::Expired.label())));
        assert!(body.contains(&format!("\"{}\"", crate::SessionStatus::UnderMinute.label())));
        assert!(body.contains("\"~\" + Math.round(secs / 60) + \" min\""));
    }

    #[test]
    fn page_globals_embed_paths_and_focus() {
        let paths = AppPaths::new("/app");
        assert_eq!(
            page_globals(&paths, Some(ComponentId(5))),
            "var _pathApp='/app/',_pathEvent='/app/e',_pathRenderComp='/app/rc',_pathSessCheck='/app/sc',_focCompId='5';"
        );
        assert!(page_globals(&paths, None).ends_with("_focCompId=null;"));
    }
}
