//! The fixed 80-class object vocabulary the word-matcher prompt must choose
//! from. Matches the class list used throughout the notification/vision
//! pipeline's class-index lookups.

pub const TARGET_CLASS_VOCABULARY: &[&str] = &[
    "person",
    "bicycle",
    "car",
    "motorcycle",
    "airplane",
    "bus",
    "train",
    "truck",
    "boat",
    "traffic light",
    "fire hydrant",
    "stop sign",
    "parking meter",
    "bench",
    "bird",
    "cat",
    "dog",
    "horse",
    "sheep",
    "cow",
    "elephant",
    "bear",
    "zebra",
    "giraffe",
    "backpack",
    "umbrella",
    "handbag",
    "tie",
    "suitcase",
    "frisbee",
    "skis",
    "snowboard",
    "sports ball",
    "kite",
    "baseball bat",
    "baseball glove",
    "skateboard",
    "surfboard",
    "tennis racket",
    "bottle",
    "wine glass",
    "cup",
    "fork",
    "knife",
    "spoon",
    "bowl",
    "banana",
    "apple",
    "sandwich",
    "orange",
    "broccoli",
    "carrot",
    "hot dog",
    "pizza",
    "donut",
    "cake",
    "chair",
    "couch",
    "potted plant",
    "bed",
    "dining table",
    "toilet",
    "tv",
    "laptop",
    "mouse",
    "remote",
    "keyboard",
    "cell phone",
    "microwave",
    "oven",
    "toaster",
    "sink",
    "refrigerator",
    "book",
    "clock",
    "vase",
    "scissors",
    "teddy bear",
    "hair drier",
    "toothbrush",
];

/// `true` if `candidate` (already lower-cased) is a member of the fixed
/// vocabulary.
pub fn is_known_class(candidate: &str) -> bool {
    TARGET_CLASS_VOCABULARY.contains(&candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabulary_has_eighty_entries() {
        assert_eq!(TARGET_CLASS_VOCABULARY.len(), 80);
    }

    #[test]
    fn known_class_lookup() {
        assert!(is_known_class("person"));
        assert!(!is_known_class("dragon"));
    }
}
