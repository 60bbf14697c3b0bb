//! Display colour names used by the planning system, as RGB triples.

const FALLBACK: [u16; 3] = [255, 255, 0];

const NAMED: &[(&str, [u16; 3])] = &[
    ("aquamarine", [127, 255, 212]),
    ("beige", [245, 245, 220]),
    ("black", [0, 0, 0]),
    ("blue", [0, 0, 255]),
    ("brown", [165, 42, 42]),
    ("chocolate", [210, 105, 30]),
    ("coral", [255, 127, 80]),
    ("cyan", [0, 255, 255]),
    ("forest", [34, 139, 34]),
    ("forestgreen", [34, 139, 34]),
    ("gold", [255, 215, 0]),
    ("gray", [128, 128, 128]),
    ("green", [0, 128, 0]),
    ("grey", [128, 128, 128]),
    ("khaki", [240, 230, 140]),
    ("lavender", [230, 230, 250]),
    ("lightblue", [173, 216, 230]),
    ("lightorange", [255, 200, 124]),
    ("lime", [0, 255, 0]),
    ("magenta", [255, 0, 255]),
    ("maroon", [128, 0, 0]),
    ("navy", [0, 0, 128]),
    ("olive", [128, 128, 0]),
    ("orange", [255, 165, 0]),
    ("orchid", [218, 112, 214]),
    ("pink", [255, 192, 203]),
    ("purple", [128, 0, 128]),
    ("red", [255, 0, 0]),
    ("salmon", [250, 128, 114]),
    ("seashell", [255, 245, 238]),
    ("skyblue", [135, 206, 235]),
    ("slateblue", [106, 90, 205]),
    ("steelblue", [70, 130, 180]),
    ("tan", [210, 180, 140]),
    ("teal", [0, 128, 128]),
    ("tomato", [255, 99, 71]),
    ("violet", [238, 130, 238]),
    ("white", [255, 255, 255]),
    ("yellow", [255, 255, 0]),
    ("yellowgreen", [154, 205, 50]),
];

/// RGB for a colour name, yellow when the name is unknown or absent.
///
/// Matching ignores case, spaces and underscores.
pub fn display_color(name: Option<&str>) -> [u16; 3] {
    let Some(name) = name else {
        return FALLBACK;
    };
    let key: String = name
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    NAMED
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map_or(FALLBACK, |(_, rgb)| *rgb)
}
