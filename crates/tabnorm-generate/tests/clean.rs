use proptest::prelude::*;
use tabnorm_generate::clean_response;

#[test]
fn strips_fences_with_language_tag() {
    let raw = "```python\nimport pandas as pd\n\ndef transform(a, b):\n    pass\n```";
    assert_eq!(
        clean_response(raw),
        "import pandas as pd\n\ndef transform(a, b):\n    pass"
    );
}

#[test]
fn reasoning_block_spanning_lines_is_removed() {
    let raw = "<THINKING>\nI should map cust to customer_id\n</THINKING>\nprint('ok')";
    assert_eq!(clean_response(raw), "print('ok')");
}

proptest! {
    #[test]
    fn plain_code_is_only_trimmed(code in "[a-f0-9 =+<>\n]{0,200}") {
        prop_assert_eq!(clean_response(&code), code.trim());
    }

    #[test]
    fn fenced_code_is_unwrapped(body in "[a-f0-9 =<>]{1,40}") {
        let raw = format!("Sure!\n```\n{body}\n```\nDone.");
        prop_assert_eq!(clean_response(&raw), body.trim());
    }
}
