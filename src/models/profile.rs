/// Issuer identity printed in the invoice header and signatory block.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyProfile {
    pub name: String,
    pub tagline: String,
    pub pan: String,
    pub gst: String,
    pub terms: String,
}
