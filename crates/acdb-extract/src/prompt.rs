use acdb_core::AreaCode;

/// Shape the model is asked to reproduce. Field values are illustrative.
const RESPONSE_SHAPE: &str = r#"{
    "area_code": "200",
    "general_information": {
        "type_of_code": "Easily Recognizable Code",
        "assignable": "Yes",
        "geographic_or_non_geographic": "Non-geographic (N)",
        "code_reserved_for_future_use": "No",
        "code_assigned": "No",
        "code_in_use": "No"
    },
    "geographic_information": {
        "location": "",
        "country": "",
        "time_zone": "",
        "parent_npa": "",
        "overlay_code": "",
        "overlay_complex": "",
        "jeopardy": "",
        "relief_planning_in_progress": "No"
    }
}"#;

/// Builds the extraction request for `code` over the raw `page` markup.
///
/// The page is appended verbatim after the instructions.
#[must_use]
pub fn build_prompt(code: AreaCode, page: &str) -> String {
    format!(
        "Using the HTML content provided, produce JSON describing area code {code} only.\n\
         If the page carries no information about {code}, return an empty JSON object {{}}.\n\
         If you cannot extract the data, return a JSON object with a single \"reason\" \
         string explaining why.\n\
         Return only JSON, with no markdown and no commentary.\n\
         \n\
         Follow this format exactly:\n\
         {RESPONSE_SHAPE}\n\
         \n\
         HTML content:\n\
         {page}"
    )
}
