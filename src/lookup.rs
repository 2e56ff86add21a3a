//! Static lookup tables for regions and product categories.
//!
//! Each table is an ordered list of label groups. A [`LabelIndex`] inverts
//! the groups into a name → label map once, so per-row lookups are a single
//! hash probe. Matching is exact string equality: spelling variants that are
//! not listed verbatim fall back to [`OTHER_LABEL`].

use crate::config::LabelGroup;
use crate::constants::OTHER_LABEL;
use crate::error::{PriceError, Result};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Reverse index from member name to group label
#[derive(Debug, Clone, Default)]
pub struct LabelIndex {
    labels: Vec<String>,
    members: HashMap<String, usize>,
}

impl LabelIndex {
    /// Build the index from ordered label groups.
    ///
    /// A name listed under several labels keeps the first label it appears
    /// under; repeated names inside one group are harmless.
    pub fn from_groups(groups: &[LabelGroup]) -> Result<Self> {
        let mut labels = Vec::with_capacity(groups.len());
        let mut members = HashMap::new();

        for group in groups {
            if group.label.trim().is_empty() {
                return Err(PriceError::configuration("lookup group with empty label"));
            }
            if group.label == OTHER_LABEL {
                return Err(PriceError::configuration(format!(
                    "'{}' is reserved for unmatched names and cannot be a group label",
                    OTHER_LABEL
                )));
            }

            let position = match labels.iter().position(|l| l == &group.label) {
                Some(position) => position,
                None => {
                    labels.push(group.label.clone());
                    labels.len() - 1
                }
            };

            for name in &group.members {
                if let Some(&existing) = members.get(name) {
                    if existing != position {
                        debug!(
                            "'{}' listed under both '{}' and '{}', keeping the first",
                            name, labels[existing], group.label
                        );
                    }
                    continue;
                }
                members.insert(name.clone(), position);
            }
        }

        Ok(Self { labels, members })
    }

    /// Label for a name, or [`OTHER_LABEL`] when the name is not listed
    pub fn label_for(&self, name: &str) -> &str {
        self.members
            .get(name)
            .map(|&i| self.labels[i].as_str())
            .unwrap_or(OTHER_LABEL)
    }

    /// Configured labels in declaration order, without the fallback label
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Every label a lookup can return, fallback included
    pub fn label_set(&self) -> BTreeSet<&str> {
        self.labels
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(OTHER_LABEL))
            .collect()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

/// Convert a static table into owned label groups
pub fn groups_from_table(table: &[(&str, &[&str])]) -> Vec<LabelGroup> {
    table
        .iter()
        .map(|(label, members)| LabelGroup {
            label: label.to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
        })
        .collect()
}

/// Built-in partition of areas into world regions
pub const DEFAULT_REGIONS: &[(&str, &[&str])] = &[
    (
        "Africa",
        &[
            "Algeria",
            "Angola",
            "Benin",
            "Botswana",
            "Burkina Faso",
            "Burundi",
            "Cabo Verde",
            "Cameroon",
            "Central African Republic",
            "Chad",
            "Comoros",
            "Congo",
            "Côte d'Ivoire",
            "Democratic Republic of the Congo",
            "Egypt",
            "Equatorial Guinea",
            "Eritrea",
            "Eswatini",
            "Ethiopia",
            "Gabon",
            "Gambia",
            "Ghana",
            "Guinea",
            "Guinea-Bissau",
            "Kenya",
            "Lesotho",
            "Liberia",
            "Libya",
            "Madagascar",
            "Malawi",
            "Mali",
            "Mauritania",
            "Mauritius",
            "Morocco",
            "Mozambique",
            "Namibia",
            "Niger",
            "Nigeria",
            "Rwanda",
            "Sao Tome and Principe",
            "Senegal",
            "Seychelles",
            "Sierra Leone",
            "Somalia",
            "South Africa",
            "South Sudan",
            "Sudan",
            "Togo",
            "Tunisia",
            "Uganda",
            "United Republic of Tanzania",
            "Zambia",
            "Zimbabwe",
        ],
    ),
    (
        "Americas",
        &[
            "Antigua and Barbuda",
            "Argentina",
            "Bahamas",
            "Barbados",
            "Belize",
            "Bolivia (Plurinational State of)",
            "Brazil",
            "Canada",
            "Chile",
            "Colombia",
            "Costa Rica",
            "Cuba",
            "Dominica",
            "Dominican Republic",
            "Ecuador",
            "El Salvador",
            "Grenada",
            "Guatemala",
            "Guyana",
            "Haiti",
            "Honduras",
            "Jamaica",
            "Mexico",
            "Nicaragua",
            "Panama",
            "Paraguay",
            "Peru",
            "Puerto Rico",
            "Saint Kitts and Nevis",
            "Saint Lucia",
            "Saint Vincent and the Grenadines",
            "Suriname",
            "Trinidad and Tobago",
            "United States of America",
            "Uruguay",
            "Venezuela (Bolivarian Republic of)",
        ],
    ),
    (
        "Asia",
        &[
            "Afghanistan",
            "Armenia",
            "Azerbaijan",
            "Bahrain",
            "Bangladesh",
            "Bhutan",
            "Brunei Darussalam",
            "Cambodia",
            "China, mainland",
            "Cyprus",
            "Georgia",
            "India",
            "Indonesia",
            "Iran (Islamic Republic of)",
            "Iraq",
            "Israel",
            "Japan",
            "Jordan",
            "Kazakhstan",
            "Kuwait",
            "Kyrgyzstan",
            "Lao People's Democratic Republic",
            "Lebanon",
            "Malaysia",
            "Maldives",
            "Mongolia",
            "Myanmar",
            "Nepal",
            "Oman",
            "Pakistan",
            "Palestine",
            "Philippines",
            "Qatar",
            "Republic of Korea",
            "Saudi Arabia",
            "Singapore",
            "Sri Lanka",
            "Syrian Arab Republic",
            "Tajikistan",
            "Thailand",
            "Timor-Leste",
            "Türkiye",
            "Turkmenistan",
            "United Arab Emirates",
            "Uzbekistan",
            "Viet Nam",
            "Yemen",
            "Democratic People's Republic of Korea",
        ],
    ),
    (
        "Europe",
        &[
            "Albania",
            "Austria",
            "Belarus",
            "Belgium",
            "Bosnia and Herzegovina",
            "Bulgaria",
            "Croatia",
            "Czechia",
            "Denmark",
            "Estonia",
            "Finland",
            "France",
            "Germany",
            "Greece",
            "Hungary",
            "Iceland",
            "Ireland",
            "Italy",
            "Latvia",
            "Lithuania",
            "Luxembourg",
            "Malta",
            "Netherlands (Kingdom of the)",
            "North Macedonia",
            "Norway",
            "Poland",
            "Portugal",
            "Republic of Moldova",
            "Romania",
            "Russian Federation",
            "Serbia",
            "Slovakia",
            "Slovenia",
            "Spain",
            "Sweden",
            "Switzerland",
            "Ukraine",
            "United Kingdom of Great Britain and Northern Ireland",
        ],
    ),
    (
        "Oceania",
        &[
            "Australia",
            "Cook Islands",
            "Fiji",
            "French Polynesia",
            "New Caledonia",
            "New Zealand",
            "Papua New Guinea",
            "Samoa",
            "Solomon Islands",
            "Tonga",
            "Vanuatu",
        ],
    ),
];

/// Built-in partition of items into product categories
pub const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Cereals",
        &[
            "Wheat",
            "Rice",
            "Maize (corn)",
            "Barley",
            "Sorghum",
            "Millet",
            "Oats",
            "Rye",
            "Triticale",
            "Buckwheat",
            "Quinoa",
            "Fonio",
            "Cereals, primary",
            "Coarse Grain, Total",
            "Cereals (Rice Milled Eqv)",
            "Canary seed",
            "Mixed grain",
            "Cereals n.e.c.",
        ],
    ),
    (
        "Fruits",
        &[
            "Apples",
            "Oranges",
            "Bananas",
            "Grapes",
            "Mangoes, guavas and mangosteens",
            "Pineapples",
            "Papayas",
            "Lemons and limes",
            "Tangerines, mandarins, clementines",
            "Peaches and nectarines",
            "Plums and sloes",
            "Strawberries",
            "Watermelons",
            "Cantaloupes and other melons",
            "Pomelos and grapefruits",
            "Pears",
            "Apricots",
            "Cherries",
            "Sour cherries",
            "Figs",
            "Dates",
            "Kiwi fruit",
            "Avocados",
            "Persimmons",
            "Cashewapple",
            "Fruit Primary",
            "Fruit excl Melons, Total",
            "Citrus Fruit, Total",
            "Fruit Incl Melons",
            "Other citrus fruit, n.e.c.",
            "Other tropical fruits, n.e.c.",
            "Blueberries",
            "Raspberries",
            "Currants",
            "Gooseberries",
            "Cranberries",
            "Other pome fruits",
            "Other stone fruits",
            "Other berries and fruits of the genus vaccinium n.e.c.",
            "Other fruits, n.e.c.",
            "Locust beans (carobs)",
            "Plantains and cooking bananas",
            "Plantains",
            "Cooking bananas",
            "Bananas",
            "Other bananas (excluding cavendish and cooking bananas)",
            "Bananas cavendish",
            "Quinces",
        ],
    ),
    (
        "Vegetables",
        &[
            "Tomatoes",
            "Potatoes",
            "Onions and shallots, dry (excluding dehydrated)",
            "Onions and shallots, green",
            "Carrots and turnips",
            "Cabbages",
            "Lettuce and chicory",
            "Cucumbers and gherkins",
            "Eggplants (aubergines)",
            "Chillies and peppers, green (Capsicum spp. and Pimenta spp.)",
            "Spinach",
            "Cauliflowers and broccoli",
            "Asparagus",
            "Green garlic",
            "Peas, green",
            "Beans, green",
            "String beans",
            "Other beans, green",
            "Broad beans and horse beans, green",
            "Pumpkins, squash and gourds",
            "Okra",
            "Green corn (maize)",
            "Mushrooms and truffles",
            "Artichokes",
            "Vegetables Primary",
            "Vegetables&Melons, Total",
            "Vegetables",
            "Leeks and other alliaceous vegetables",
            "Other vegetables, fresh n.e.c.",
            "Chicory roots",
        ],
    ),
    (
        "Meat",
        &[
            "Meat of cattle with the bone, fresh or chilled",
            "Meat of cattle with the bone, fresh or chilled (biological)",
            "Meat of chickens, fresh or chilled",
            "Meat of chickens, fresh or chilled (biological)",
            "Meat of sheep, fresh or chilled",
            "Meat of sheep, fresh or chilled (biological)",
            "Meat of goat, fresh or chilled",
            "Meat of goat, fresh or chilled (biological)",
            "Meat of pig with the bone, fresh or chilled",
            "Meat of pig with the bone, fresh or chilled (biological)",
            "Meat of turkeys, fresh or chilled",
            "Meat of turkeys, fresh or chilled (biological)",
            "Meat of ducks, fresh or chilled",
            "Meat of ducks, fresh or chilled (biological)",
            "Meat of geese, fresh or chilled",
            "Meat of geese, fresh or chilled (biological)",
            "Meat of rabbits and hares, fresh or chilled",
            "Meat of rabbits and hares, fresh or chilled (biological)",
            "Meat, Total",
            "Meat Liveweight, Total",
            "Horse meat, fresh or chilled",
            "Horse meat, fresh or chilled (biological)",
            "Meat of asses, fresh or chilled",
            "Meat of asses, fresh or chilled (biological)",
            "Meat of mules, fresh or chilled",
            "Meat of mules, fresh or chilled (biological)",
            "Meat of camels, fresh or chilled",
            "Meat of camels, fresh or chilled (biological)",
            "Meat of other domestic camelids, fresh or chilled",
            "Meat of other domestic camelids, fresh or chilled (biological)",
            "Meat of other domestic rodents, fresh or chilled",
            "Meat of other domestic rodents, fresh or chilled (biological)",
            "Other meat of mammals, fresh or chilled",
            "Game meat, fresh, chilled or frozen",
            "Meat of pigeons and other birds n.e.c., fresh, chilled or frozen",
            "Meat of pigeons and other birds n.e.c., fresh, chilled or frozen (biological)",
            "Meat of buffalo, fresh or chilled",
            "Meat of buffalo, fresh or chilled (biological)",
        ],
    ),
    (
        "Dairy & Eggs",
        &[
            "Raw milk of cattle",
            "Raw milk of buffalo",
            "Raw milk of sheep",
            "Raw milk of goats",
            "Raw milk of camel",
            "Milk, Total",
            "Hen eggs in shell, fresh",
            "Eggs Primary",
            "Eggs from other birds in shell, fresh, n.e.c.",
        ],
    ),
    (
        "Oilseeds",
        &[
            "Soya beans",
            "Groundnuts, excluding shelled",
            "Sunflower seed",
            "Rape or colza seed",
            "Cotton seed",
            "Oil palm fruit",
            "Palm kernels",
            "Coconuts, in shell",
            "Sesame seed",
            "Linseed",
            "Castor oil seeds",
            "Safflower seed",
            "Mustard seed",
            "Poppy seed",
            "Olives",
            "Oilcrops, Oil Equivalent",
            "Karite nuts (sheanuts)",
            "Melonseed",
            "Jojoba seeds",
            "Tallowtree seeds",
            "Hempseed",
            "Other oil seeds, n.e.c.",
        ],
    ),
    (
        "Roots & Tubers",
        &[
            "Cassava, fresh",
            "Sweet potatoes",
            "Yams",
            "Taro",
            "Yautia",
            "Roots and Tubers, Total",
            "Edible roots and tubers with high starch or inulin content, n.e.c., fresh",
        ],
    ),
    (
        "Pulses",
        &[
            "Beans, dry",
            "Peas, dry",
            "Lentils, dry",
            "Chick peas, dry",
            "Broad beans and horse beans, dry",
            "Cow peas, dry",
            "Pigeon peas, dry",
            "Bambara beans, dry",
            "Vetches",
            "Lupins",
            "Pulses, Total",
            "Other pulses n.e.c.",
        ],
    ),
    (
        "Beverages",
        &[
            "Coffee, green",
            "Cocoa beans",
            "Tea leaves",
            "Maté leaves",
            "Tea nes (herbal tea)",
            "Hop cones",
        ],
    ),
    (
        "Sugar Crops",
        &[
            "Sugar cane",
            "Sugar beet",
            "Other sugar crops n.e.c.",
        ],
    ),
    (
        "Nuts",
        &[
            "Almonds, in shell",
            "Walnuts, in shell",
            "Hazelnuts, in shell",
            "Pistachios, in shell",
            "Cashew nuts, in shell",
            "Brazil nuts, in shell",
            "Chestnuts, in shell",
            "Areca nuts",
            "Kola nuts",
            "Treenuts, Total",
            "Other nuts (excluding wild edible nuts and groundnuts), in shell, n.e.c.",
        ],
    ),
    (
        "Spices",
        &[
            "Pepper (Piper spp.), raw",
            "Chillies and peppers, dry (Capsicum spp., Pimenta spp.), raw",
            "Vanilla, raw",
            "Cinnamon and cinnamon-tree flowers, raw",
            "Cloves (whole stems), raw",
            "Nutmeg, mace, cardamoms, raw",
            "Anise, badian, coriander, cumin, caraway, fennel and juniper berries, raw",
            "Ginger, raw",
            "Other stimulant, spice and aromatic crops, n.e.c.",
            "Peppermint, spearmint",
        ],
    ),
    (
        "Fibers",
        &[
            "Seed cotton, unginned",
            "Cotton lint, ginned",
            "Jute, raw or retted",
            "Kenaf, and other textile bast fibres, raw or retted",
            "Flax, processed but not spun",
            "True hemp, raw or retted",
            "Ramie, raw or retted",
            "Sisal, raw",
            "Agave fibres, raw, n.e.c.",
            "Abaca, manila hemp, raw",
            "Fibre Crops Primary",
            "Other fibre crops, raw, n.e.c.",
            "Jute & Jute-like Fibres",
        ],
    ),
    (
        "Other Industrial",
        &[
            "Unmanufactured tobacco",
            "Natural rubber in primary forms",
            "Balata, gutta-percha, guayule, chicle and similar natural gums in primary forms or in plates, sheets or strip",
            "Pyrethrum, dried flowers",
            "Natural honey",
            "Beeswax",
            "Silk-worm cocoons suitable for reeling",
            "Shorn wool, greasy, including fleece-washed shorn wool",
            "Snails, fresh, chilled, frozen, dried, salted or in brine, except sea snails",
            "Vegetable tallow",
            "Stillingia oil",
            "Kapok fruit",
            "Palm oil",
            "Tung nuts",
        ],
    ),
    (
        "Aggregates",
        &[
            "Agriculture",
            "Livestock",
            "Crops, primary",
        ],
    ),
];
