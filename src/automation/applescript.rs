//! AppleScript sources for the System Events queries the smoke test needs
//!
//! Scripts return plain text so that all interpretation happens in Rust.
//! Lists are joined with the ASCII record separator (U+001E) because element
//! descriptions and static text may themselves contain newlines.

/// Separator between list items in script output
pub const RECORD_SEPARATOR: char = '\u{1e}';

/// Quote a string as an AppleScript string literal.
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Quote a string as a single-quoted JavaScript literal
fn js_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        match c {
            '\'' => quoted.push_str("\\'"),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

/// Split record-separated script output, dropping the trailing separator.
pub fn split_records(output: &str) -> Vec<String> {
    let trimmed = output.trim_end_matches(|c: char| c == '\n' || c == '\r');
    if trimmed.is_empty() {
        return Vec::new();
    }
    let trimmed = trimmed.strip_suffix(RECORD_SEPARATOR).unwrap_or(trimmed);
    trimmed.split(RECORD_SEPARATOR).map(str::to_string).collect()
}

/// Bring the application to the front
pub fn activate(app: &str) -> String {
    format!("tell application {} to activate", quote(app))
}

/// Number of windows the process currently shows
pub fn window_count(process: &str) -> String {
    format!(
        r#"tell application "System Events"
    tell process {process}
        return count of windows
    end tell
end tell"#,
        process = quote(process)
    )
}

/// Title of the front window. Errors (no window, no access) surface as a failed script.
pub fn front_window_title(process: &str) -> String {
    format!(
        r#"tell application "System Events"
    tell process {process}
        return title of front window
    end tell
end tell"#,
        process = quote(process)
    )
}

/// Accessible description of every UI element of the front window, in order.
pub fn element_descriptions(process: &str) -> String {
    format!(
        r#"tell application "System Events"
    tell process {process}
        set output to ""
        set allElements to every UI element of front window
        repeat with elem in allElements
            set elemDesc to ""
            try
                set elemDesc to description of elem as text
            end try
            set output to output & elemDesc & (character id 30)
        end repeat
        return output
    end tell
end tell"#,
        process = quote(process)
    )
}

/// Click the UI element at a 1-based index of the front window.
pub fn click_element(process: &str, index: usize) -> String {
    format!(
        r#"tell application "System Events"
    tell process {process}
        try
            click UI element {index} of front window
            return true
        on error errMsg
            return "Error: " & errMsg
        end try
    end tell
end tell"#,
        process = quote(process),
        index = index
    )
}

/// Front window title followed by the value of every `AXStaticText` element.
pub fn popup_text(process: &str) -> String {
    format!(
        r#"tell application "System Events"
    tell process {process}
        set frontWin to front window
        set output to (title of frontWin as text) & (character id 30)
        set allElements to every UI element of frontWin
        repeat with elem in allElements
            try
                if role of elem is "AXStaticText" then
                    set output to output & (value of elem as text) & (character id 30)
                end if
            end try
        end repeat
        return output
    end tell
end tell"#,
        process = quote(process)
    )
}

/// Whether the front window has a button with this label
pub fn button_exists(process: &str, label: &str) -> String {
    format!(
        r#"tell application "System Events"
    tell process {process}
        try
            return exists button {label} of front window
        on error
            return false
        end try
    end tell
end tell"#,
        process = quote(process),
        label = quote(label)
    )
}

pub fn click_button(process: &str, label: &str) -> String {
    format!(
        r#"tell application "System Events"
    tell process {process}
        try
            click button {label} of front window
            return true
        on error errMsg
            return "Error: " & errMsg
        end try
    end tell
end tell"#,
        process = quote(process),
        label = quote(label)
    )
}

/// Marker printed when the page has no element with the requested id
pub const FIELD_NOT_FOUND: &str = "FIELD_NOT_FOUND";

/// Marker printed when Chrome refuses the JavaScript call
pub const FIELD_READ_ERROR: &str = "ERROR_READING_FIELD";

/// Read a form field's value from the active tab via Chrome's `execute javascript`.
pub fn read_form_field(app: &str, field_id: &str) -> String {
    let javascript = format!(
        "(function() {{ const field = document.getElementById({id}); return field ? field.value : '{missing}'; }})()",
        id = js_quote(field_id),
        missing = FIELD_NOT_FOUND
    );
    format!(
        r#"tell application {app}
    try
        tell active tab of front window
            return execute javascript {javascript}
        end tell
    on error
        return "{error}"
    end try
end tell"#,
        app = quote(app),
        javascript = quote(&javascript),
        error = FIELD_READ_ERROR
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_escapes_quotes_and_backslashes() {
        assert_eq!(quote("Google Chrome"), r#""Google Chrome""#);
        assert_eq!(quote(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(quote(r"a\b"), r#""a\\b""#);
    }

    #[test]
    fn test_split_records() {
        let output = "Extensions\u{1e}Asterisk\nAutofill\u{1e}\u{1e}\n";
        assert_eq!(
            split_records(output),
            vec!["Extensions", "Asterisk\nAutofill", ""]
        );
        assert!(split_records("\n").is_empty());
        assert_eq!(split_records("only"), vec!["only"]);
    }

    #[test]
    fn test_scripts_target_quoted_process() {
        let script = front_window_title("Google Chrome");
        assert!(script.contains(r#"tell process "Google Chrome""#));
        assert!(script.contains("title of front window"));

        let script = click_element("Google Chrome", 4);
        assert!(script.contains("click UI element 4 of front window"));
    }

    #[test]
    fn test_button_label_is_quoted() {
        let script = click_button("Google Chrome", r#"Fill "All""#);
        assert!(script.contains(r#"click button "Fill \"All\"" of front window"#));
    }

    #[test]
    fn test_form_field_id_is_escaped_twice() {
        let script = read_form_field("Google Chrome", "o'brien");
        // JS escape, then AppleScript escape of the backslash
        assert!(script.contains(r"document.getElementById('o\\'brien')"));
        assert!(script.contains(FIELD_NOT_FOUND));
        assert!(script.contains(FIELD_READ_ERROR));
    }
}
