use super::ElementSpec;
use super::TagDataType::{Binary, Date, Float, Integer, Master, String, UnsignedInt, Utf8};

///
/// The commonly used part of the Matroska/WebM element catalog.
///
/// Only structural placement and data types are described here; the meaning of individual values is left to higher level crates.
///
pub const MATROSKA_ELEMENTS: &[ElementSpec] = &[
    ElementSpec::root("Segment", 0x18538067, Master),

    ElementSpec::child("Segment", "SeekHead", 0x114d9b74, Master),
    ElementSpec::child("SeekHead", "Seek", 0x4dbb, Master),
    ElementSpec::child("Seek", "SeekID", 0x53ab, Binary),
    ElementSpec::child("Seek", "SeekPosition", 0x53ac, UnsignedInt),

    ElementSpec::child("Segment", "Info", 0x1549a966, Master),
    ElementSpec::child("Info", "SegmentUID", 0x73a4, Binary),
    ElementSpec::child("Info", "TimecodeScale", 0x2ad7b1, UnsignedInt),
    ElementSpec::child("Info", "Duration", 0x4489, Float),
    ElementSpec::child("Info", "DateUTC", 0x4461, Date),
    ElementSpec::child("Info", "Title", 0x7ba9, Utf8),
    ElementSpec::child("Info", "MuxingApp", 0x4d80, Utf8),
    ElementSpec::child("Info", "WritingApp", 0x5741, Utf8),

    ElementSpec::child("Segment", "Tracks", 0x1654ae6b, Master),
    ElementSpec::child("Tracks", "TrackEntry", 0xae, Master),
    ElementSpec::child("TrackEntry", "TrackNumber", 0xd7, UnsignedInt),
    ElementSpec::child("TrackEntry", "TrackUID", 0x73c5, UnsignedInt),
    ElementSpec::child("TrackEntry", "TrackType", 0x83, UnsignedInt),
    ElementSpec::child("TrackEntry", "FlagEnabled", 0xb9, UnsignedInt),
    ElementSpec::child("TrackEntry", "FlagDefault", 0x88, UnsignedInt),
    ElementSpec::child("TrackEntry", "FlagForced", 0x55aa, UnsignedInt),
    ElementSpec::child("TrackEntry", "FlagLacing", 0x9c, UnsignedInt),
    ElementSpec::child("TrackEntry", "DefaultDuration", 0x23e383, UnsignedInt),
    ElementSpec::child("TrackEntry", "Name", 0x536e, Utf8),
    ElementSpec::child("TrackEntry", "Language", 0x22b59c, String),
    ElementSpec::child("TrackEntry", "CodecID", 0x86, String),
    ElementSpec::child("TrackEntry", "CodecPrivate", 0x63a2, Binary),
    ElementSpec::child("TrackEntry", "CodecName", 0x258688, Utf8),
    ElementSpec::child("TrackEntry", "CodecDelay", 0x56aa, UnsignedInt),
    ElementSpec::child("TrackEntry", "SeekPreRoll", 0x56bb, UnsignedInt),
    ElementSpec::child("TrackEntry", "Video", 0xe0, Master),
    ElementSpec::child("Video", "FlagInterlaced", 0x9a, UnsignedInt),
    ElementSpec::child("Video", "PixelWidth", 0xb0, UnsignedInt),
    ElementSpec::child("Video", "PixelHeight", 0xba, UnsignedInt),
    ElementSpec::child("Video", "DisplayWidth", 0x54b0, UnsignedInt),
    ElementSpec::child("Video", "DisplayHeight", 0x54ba, UnsignedInt),
    ElementSpec::child("TrackEntry", "Audio", 0xe1, Master),
    ElementSpec::child("Audio", "SamplingFrequency", 0xb5, Float),
    ElementSpec::child("Audio", "OutputSamplingFrequency", 0x78b5, Float),
    ElementSpec::child("Audio", "Channels", 0x9f, UnsignedInt),
    ElementSpec::child("Audio", "BitDepth", 0x6264, UnsignedInt),

    ElementSpec::child("Segment", "Cluster", 0x1f43b675, Master),
    ElementSpec::child("Cluster", "Timecode", 0xe7, UnsignedInt),
    ElementSpec::child("Cluster", "Position", 0xa7, UnsignedInt),
    ElementSpec::child("Cluster", "PrevSize", 0xab, UnsignedInt),
    ElementSpec::child("Cluster", "SimpleBlock", 0xa3, Binary),
    ElementSpec::child("Cluster", "BlockGroup", 0xa0, Master),
    ElementSpec::child("BlockGroup", "Block", 0xa1, Binary),
    ElementSpec::child("BlockGroup", "BlockDuration", 0x9b, UnsignedInt),
    ElementSpec::child("BlockGroup", "ReferenceBlock", 0xfb, Integer),

    ElementSpec::child("Segment", "Cues", 0x1c53bb6b, Master),
    ElementSpec::child("Cues", "CuePoint", 0xbb, Master),
    ElementSpec::child("CuePoint", "CueTime", 0xb3, UnsignedInt),
    ElementSpec::child("CuePoint", "CueTrackPositions", 0xb7, Master),
    ElementSpec::child("CueTrackPositions", "CueTrack", 0xf7, UnsignedInt),
    ElementSpec::child("CueTrackPositions", "CueClusterPosition", 0xf1, UnsignedInt),
    ElementSpec::child("CueTrackPositions", "CueRelativePosition", 0xf0, UnsignedInt),
    ElementSpec::child("CueTrackPositions", "CueBlockNumber", 0x5378, UnsignedInt),

    ElementSpec::child("Segment", "Tags", 0x1254c367, Master),
    ElementSpec::child("Tags", "Tag", 0x7373, Master),
    ElementSpec::child("Tag", "Targets", 0x63c0, Master),
    ElementSpec::child("Targets", "TargetTypeValue", 0x68ca, UnsignedInt),
    ElementSpec::child("Tag", "SimpleTag", 0x67c8, Master),
    ElementSpec::child("SimpleTag", "TagName", 0x45a3, Utf8),
    ElementSpec::child("SimpleTag", "TagLanguage", 0x447a, String),
    ElementSpec::child("SimpleTag", "TagString", 0x4487, Utf8),
    ElementSpec::child("SimpleTag", "TagBinary", 0x4485, Binary),
];
