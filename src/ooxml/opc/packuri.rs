/// Part names inside a spreadsheet package.
///
/// A part name always begins with a forward slash (`/xl/workbook.xml`); the
/// matching zip member name is the same string without it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackURI {
    uri: String,
}

impl PackURI {
    /// Create a part name, rejecting anything that is not absolute.
    pub fn new<S: Into<String>>(uri: S) -> Result<Self, String> {
        let uri = uri.into();
        if !uri.starts_with('/') {
            return Err(format!("PackURI must begin with slash, got '{}'", uri));
        }
        Ok(PackURI { uri })
    }

    /// Resolve a relationship target against the directory of its source part.
    ///
    /// `("/xl/worksheets", "../drawings/drawing1.xml")` gives
    /// `/xl/drawings/drawing1.xml`. Targets that are already absolute
    /// (`/xl/media/image1.png`) ignore the base.
    pub fn from_rel_ref(base_uri: &str, relative_ref: &str) -> Result<Self, String> {
        let joined = if relative_ref.starts_with('/') {
            relative_ref.to_string()
        } else if base_uri.ends_with('/') {
            format!("{}{}", base_uri, relative_ref)
        } else {
            format!("{}/{}", base_uri, relative_ref)
        };
        Self::new(Self::normalize_path(&joined))
    }

    /// Directory portion, `/xl/worksheets` for `/xl/worksheets/sheet1.xml`.
    pub fn base_uri(&self) -> &str {
        match self.uri.rfind('/') {
            Some(0) | None => "/",
            Some(pos) => &self.uri[..pos],
        }
    }

    pub fn filename(&self) -> &str {
        self.uri
            .rfind('/')
            .map(|pos| &self.uri[pos + 1..])
            .unwrap_or("")
    }

    /// Zip member name (leading slash stripped).
    pub fn membername(&self) -> &str {
        self.uri.strip_prefix('/').unwrap_or(&self.uri)
    }

    /// The `.rels` part holding this part's relationships,
    /// `/xl/worksheets/_rels/sheet1.xml.rels` for `/xl/worksheets/sheet1.xml`.
    pub fn rels_uri(&self) -> Result<PackURI, String> {
        let base_uri = self.base_uri();
        let rels = if base_uri == "/" {
            format!("/_rels/{}.rels", self.filename())
        } else {
            format!("{}/_rels/{}.rels", base_uri, self.filename())
        };
        Self::new(rels)
    }

    pub fn as_str(&self) -> &str {
        &self.uri
    }

    // Collapse "." and ".." segments; ".." never climbs above the root.
    fn normalize_path(path: &str) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for part in path.split('/') {
            match part {
                "" | "." => {},
                ".." => {
                    parts.pop();
                },
                _ => parts.push(part),
            }
        }
        format!("/{}", parts.join("/"))
    }
}

impl std::fmt::Display for PackURI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.uri)
    }
}

/// The package pseudo-partname, source of the package-level relationships.
pub const PACKAGE_URI: &str = "/";
