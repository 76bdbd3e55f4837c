use convert_case::{Case, Casing};

/// `StudentSchoolAssociation` -> `student_school_association`
#[must_use]
pub fn to_snake(name: &str) -> String {
    name.to_case(Case::Snake)
}

/// `StudentSchoolAssociation` -> `studentSchoolAssociation`
#[must_use]
pub fn to_camel(name: &str) -> String {
    name.to_case(Case::Camel)
}

/// `StudentSchoolAssociation` -> `Student School Association`
#[must_use]
pub fn to_title(name: &str) -> String {
    name.to_case(Case::Title)
}

// upper_first
#[must_use]
pub fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    chars
        .next()
        .map(|c| c.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pascal_names_convert() {
        assert_eq!(to_snake("StudentSchoolAssociation"), "student_school_association");
        assert_eq!(to_camel("StudentSchoolAssociation"), "studentSchoolAssociation");
        assert_eq!(to_title("StudentSchoolAssociation"), "Student School Association");
    }

    #[test]
    fn upper_first_leaves_rest_alone() {
        assert_eq!(upper_first("sample"), "Sample");
        assert_eq!(upper_first("tPDM"), "TPDM");
        assert_eq!(upper_first(""), "");
    }
}
