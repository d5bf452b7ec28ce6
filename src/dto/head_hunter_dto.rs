use serde::Deserialize;

/// `GET /vacancies` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct HhSearchResponse {
    #[serde(default)]
    pub found: u64,
    #[serde(default)]
    pub items: Vec<HhVacancy>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HhVacancy {
    pub id: String,
    pub name: Option<String>,
    pub salary: Option<HhSalary>,
    pub snippet: Option<HhSnippet>,
    pub employer: Option<HhEmployer>,
    pub area: Option<HhAreaRef>,
    pub url: Option<String>,
    pub alternate_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HhSalary {
    pub from: Option<f64>,
    pub to: Option<f64>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HhSnippet {
    pub requirement: Option<String>,
    pub responsibility: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HhEmployer {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HhAreaRef {
    pub name: Option<String>,
}

/// Node of the `GET /areas` tree: countries contain regions, regions
/// contain cities.
#[derive(Debug, Clone, Deserialize)]
pub struct HhArea {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub areas: Vec<HhArea>,
}

impl HhArea {
    /// Depth-first lookup of an exact area name.
    pub fn find(&self, name: &str) -> Option<&HhArea> {
        if self.name == name {
            return Some(self);
        }
        self.areas.iter().find_map(|child| child.find(name))
    }
}
