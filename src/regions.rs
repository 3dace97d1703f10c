//! Reference descriptions of common cortical regions of the Desikan-Killiany atlas, keyed by region name.

use serde::ser::{Serialize, SerializeMap, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct RegionDescription {
    pub name: &'static str,
    pub function: &'static str,
    pub clinical: &'static str,
}

const fn desc(name: &'static str, function: &'static str, clinical: &'static str) -> RegionDescription {
    RegionDescription { name, function, clinical }
}

pub static REGION_DESCRIPTIONS: [(&str, RegionDescription); 21] = [
    ("superiorfrontal", desc("Superior Frontal Gyrus", "Executive function, working memory, self-awareness", "Damage may cause executive dysfunction, personality changes")),
    ("middlefrontal", desc("Middle Frontal Gyrus", "Attention, working memory, cognitive control", "Associated with ADHD, depression when dysfunctional")),
    ("inferiorfrontal", desc("Inferior Frontal Gyrus", "Language production (Broca's area), inhibition", "Damage causes Broca's aphasia, difficulty with speech production")),
    ("precentral", desc("Precentral Gyrus", "Primary motor cortex, voluntary movement control", "Damage causes paralysis or weakness on opposite side of body")),
    ("postcentral", desc("Postcentral Gyrus", "Primary somatosensory cortex, touch and proprioception", "Damage causes loss of sensation on opposite side of body")),
    ("superiortemporal", desc("Superior Temporal Gyrus", "Auditory processing, language comprehension (Wernicke's area)", "Damage may cause Wernicke's aphasia, auditory hallucinations")),
    ("middletemporal", desc("Middle Temporal Gyrus", "Language, semantic memory, visual processing", "Associated with semantic dementia, word-finding difficulties")),
    ("inferiortemporal", desc("Inferior Temporal Gyrus", "Object recognition, face processing, visual memory", "Damage may cause prosopagnosia (face blindness)")),
    ("superiorparietal", desc("Superior Parietal Lobule", "Spatial awareness, attention, sensorimotor integration", "Damage causes spatial neglect, difficulty with coordination")),
    ("inferiorparietal", desc("Inferior Parietal Lobule", "Language, mathematical cognition, body image", "Damage may cause Gerstmann syndrome, dyscalculia")),
    ("precuneus", desc("Precuneus", "Self-consciousness, episodic memory, visuospatial processing", "Early affected in Alzheimer's disease")),
    ("cuneus", desc("Cuneus", "Basic visual processing", "Damage causes visual field defects")),
    ("lateraloccipital", desc("Lateral Occipital Cortex", "Object recognition, motion processing", "Damage may cause object agnosia")),
    ("lingual", desc("Lingual Gyrus", "Visual processing, color perception, word recognition", "Damage may cause alexia (reading difficulty), color agnosia")),
    ("fusiform", desc("Fusiform Gyrus", "Face recognition, object categorization, reading", "Damage causes prosopagnosia, difficulty recognizing faces")),
    ("parahippocampal", desc("Parahippocampal Gyrus", "Memory encoding, spatial navigation, scene processing", "Critical for memory formation, affected in Alzheimer's")),
    ("entorhinal", desc("Entorhinal Cortex", "Memory, navigation, time perception", "First area affected in Alzheimer's disease")),
    ("temporalpole", desc("Temporal Pole", "Social and emotional processing, semantic memory", "Damage associated with behavioral changes, semantic dementia")),
    ("frontalpole", desc("Frontal Pole", "Complex reasoning, planning, multitasking", "Damage affects abstract thinking and planning abilities")),
    ("cingulate", desc("Cingulate Cortex", "Emotion, attention, cognitive control, pain processing", "Associated with depression, chronic pain, ADHD")),
    ("insula", desc("Insular Cortex", "Interoception, emotion, empathy, taste", "Damage affects emotional awareness, addiction vulnerability")),
];

/// Look up the description of a region by its atlas name, e.g. `precuneus`.
pub fn region_description(region: &str) -> Option<&'static RegionDescription> {
    REGION_DESCRIPTIONS
        .iter()
        .find(|(key, _)| *key == region)
        .map(|(_, description)| description)
}

/// Serializes the whole reference table as a JSON object, in table order.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionDescriptions;

impl Serialize for RegionDescriptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(REGION_DESCRIPTIONS.len()))?;
        for (key, description) in REGION_DESCRIPTIONS.iter() {
            map.serialize_entry(key, description)?;
        }
        map.end()
    }
}
