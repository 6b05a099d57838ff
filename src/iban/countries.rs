//! Country registry for IBAN structure rules
//!
//! Each entry carries the total IBAN length and, where the national format
//! has one, the position of the bank code inside the BBAN. Countries with a
//! simple "bank code + zero padded account" layout also carry a calculation
//! layout used by the `/calculate` endpoints.

/// Layout used to build a BBAN from a bank code and account number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BbanLayout {
    pub bank_code_length: usize,
    pub account_length: usize,
    /// Bank codes may contain letters (e.g. NL `ABNA`)
    pub alphanumeric_bank_code: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryRule {
    pub code: &'static str,
    pub name: &'static str,
    pub iban_length: usize,
    /// (offset, length) of the bank code inside the BBAN
    pub bank_code: Option<(usize, usize)>,
    pub layout: Option<BbanLayout>,
}

const fn rule(
    code: &'static str,
    name: &'static str,
    iban_length: usize,
    bank_code: Option<(usize, usize)>,
) -> CountryRule {
    CountryRule { code, name, iban_length, bank_code, layout: None }
}

const fn with_layout(
    code: &'static str,
    name: &'static str,
    iban_length: usize,
    bank_code_length: usize,
    account_length: usize,
    alphanumeric_bank_code: bool,
) -> CountryRule {
    CountryRule {
        code,
        name,
        iban_length,
        bank_code: Some((0, bank_code_length)),
        layout: Some(BbanLayout { bank_code_length, account_length, alphanumeric_bank_code }),
    }
}

// Sorted by country code
static COUNTRIES: &[CountryRule] = &[
    rule("AD", "Andorra", 24, Some((0, 4))),
    rule("AE", "United Arab Emirates", 23, Some((0, 3))),
    rule("AL", "Albania", 28, Some((0, 8))),
    with_layout("AT", "Austria", 20, 5, 11, false),
    rule("AZ", "Azerbaijan", 28, Some((0, 4))),
    rule("BA", "Bosnia and Herzegovina", 20, Some((0, 3))),
    rule("BE", "Belgium", 16, Some((0, 3))),
    rule("BG", "Bulgaria", 22, Some((0, 4))),
    rule("BH", "Bahrain", 22, Some((0, 4))),
    rule("BR", "Brazil", 29, Some((0, 8))),
    rule("BY", "Belarus", 28, Some((0, 4))),
    with_layout("CH", "Switzerland", 21, 5, 12, false),
    rule("CR", "Costa Rica", 22, Some((0, 4))),
    rule("CY", "Cyprus", 28, Some((0, 3))),
    rule("CZ", "Czech Republic", 24, Some((0, 4))),
    with_layout("DE", "Germany", 22, 8, 10, false),
    rule("DK", "Denmark", 18, Some((0, 4))),
    rule("DO", "Dominican Republic", 28, Some((0, 4))),
    rule("EE", "Estonia", 20, Some((0, 2))),
    rule("EG", "Egypt", 29, Some((0, 4))),
    rule("ES", "Spain", 24, Some((0, 4))),
    rule("FI", "Finland", 18, Some((0, 3))),
    rule("FO", "Faroe Islands", 18, Some((0, 4))),
    rule("FR", "France", 27, Some((0, 5))),
    rule("GB", "United Kingdom", 22, Some((0, 4))),
    rule("GE", "Georgia", 22, Some((0, 2))),
    rule("GI", "Gibraltar", 23, Some((0, 4))),
    rule("GL", "Greenland", 18, Some((0, 4))),
    rule("GR", "Greece", 27, Some((0, 3))),
    rule("GT", "Guatemala", 28, Some((0, 4))),
    rule("HR", "Croatia", 21, Some((0, 7))),
    rule("HU", "Hungary", 28, Some((0, 3))),
    rule("IE", "Ireland", 22, Some((0, 4))),
    rule("IL", "Israel", 23, Some((0, 3))),
    rule("IQ", "Iraq", 23, Some((0, 4))),
    rule("IS", "Iceland", 26, Some((0, 4))),
    rule("IT", "Italy", 27, Some((1, 5))),
    rule("JO", "Jordan", 30, Some((0, 4))),
    rule("KW", "Kuwait", 30, Some((0, 4))),
    rule("KZ", "Kazakhstan", 20, Some((0, 3))),
    rule("LB", "Lebanon", 28, Some((0, 4))),
    rule("LC", "Saint Lucia", 32, Some((0, 4))),
    with_layout("LI", "Liechtenstein", 21, 5, 12, false),
    rule("LT", "Lithuania", 20, Some((0, 5))),
    with_layout("LU", "Luxembourg", 20, 3, 13, false),
    rule("LV", "Latvia", 21, Some((0, 4))),
    rule("MC", "Monaco", 27, Some((0, 5))),
    rule("MD", "Moldova", 24, Some((0, 2))),
    rule("ME", "Montenegro", 22, Some((0, 3))),
    rule("MK", "North Macedonia", 19, Some((0, 3))),
    rule("MR", "Mauritania", 27, Some((0, 5))),
    rule("MT", "Malta", 31, Some((0, 4))),
    rule("MU", "Mauritius", 30, Some((0, 6))),
    with_layout("NL", "Netherlands", 18, 4, 10, true),
    rule("NO", "Norway", 15, Some((0, 4))),
    rule("PK", "Pakistan", 24, Some((0, 4))),
    rule("PL", "Poland", 28, Some((0, 8))),
    rule("PS", "Palestine", 29, Some((0, 4))),
    rule("PT", "Portugal", 25, Some((0, 4))),
    rule("QA", "Qatar", 29, Some((0, 4))),
    rule("RO", "Romania", 24, Some((0, 4))),
    rule("RS", "Serbia", 22, Some((0, 3))),
    rule("SA", "Saudi Arabia", 24, Some((0, 2))),
    rule("SC", "Seychelles", 31, Some((0, 6))),
    rule("SE", "Sweden", 24, Some((0, 3))),
    rule("SI", "Slovenia", 19, Some((0, 5))),
    rule("SK", "Slovakia", 24, Some((0, 4))),
    rule("SM", "San Marino", 27, Some((1, 5))),
    rule("ST", "Sao Tome and Principe", 25, Some((0, 4))),
    rule("SV", "El Salvador", 28, Some((0, 4))),
    rule("TL", "Timor-Leste", 23, Some((0, 3))),
    rule("TN", "Tunisia", 24, Some((0, 2))),
    rule("TR", "Turkey", 26, Some((1, 5))),
    rule("UA", "Ukraine", 29, Some((0, 6))),
    rule("VA", "Vatican City", 22, Some((0, 3))),
    rule("VG", "British Virgin Islands", 24, Some((0, 4))),
    rule("XK", "Kosovo", 20, Some((0, 4))),
];

/// Look up the rules for an (uppercase) ISO country code.
pub fn find(code: &str) -> Option<&'static CountryRule> {
    COUNTRIES
        .binary_search_by(|rule| rule.code.cmp(code))
        .ok()
        .map(|idx| &COUNTRIES[idx])
}

/// All registered countries, sorted by code.
pub fn all() -> &'static [CountryRule] {
    COUNTRIES
}
