use glbread_core::{ComponentType, ElementType};
use glbread_io::{parse_glb, write_container, Accessor, BufferView};
use proptest::prelude::*;

const COMPONENT_CODES: [u32; 6] = [5120, 5121, 5122, 5123, 5125, 5126];
const TYPE_NAMES: [&str; 7] = ["SCALAR", "VEC2", "VEC3", "VEC4", "MAT2", "MAT3", "MAT4"];
const NOISE: [&str; 4] = [
    r#""name":"n""#,
    r#""extras":{"a":[1,{"b":[2,3]}],"c":null}"#,
    r#""min":[-1.5,0,2e3]"#,
    r#""extensions":{"EXT_x":{"y":{"z":[[],[{}]]}}}"#,
];

#[derive(Debug, Clone)]
struct AccessorCase {
    buffer_view: u32,
    byte_offset: Option<u32>,
    component: usize,
    element: usize,
    count: u32,
    noise: Vec<usize>,
}

impl AccessorCase {
    fn to_json(&self) -> String {
        let mut members = vec![
            format!(r#""bufferView":{}"#, self.buffer_view),
            format!(r#""componentType":{}"#, COMPONENT_CODES[self.component]),
            format!(r#""type":"{}""#, TYPE_NAMES[self.element]),
            format!(r#""count":{}"#, self.count),
        ];
        if let Some(offset) = self.byte_offset {
            members.push(format!(r#""byteOffset":{}"#, offset));
        }
        // Unknown members go in front of, between and after the known ones.
        for (i, &noise) in self.noise.iter().enumerate() {
            let at = (i * 2).min(members.len());
            members.insert(at, NOISE[noise].to_string());
        }
        format!("{{{}}}", members.join(","))
    }

    fn expected(&self) -> Accessor {
        Accessor {
            buffer_view: self.buffer_view,
            byte_offset: self.byte_offset.unwrap_or(0),
            component_type: ComponentType::from_code(COMPONENT_CODES[self.component]),
            element_type: ElementType::from_name(TYPE_NAMES[self.element].as_bytes()),
            count: self.count,
        }
    }
}

fn accessor_case(views: u32) -> impl Strategy<Value = AccessorCase> {
    (
        0..views,
        proptest::option::of(0u32..1024),
        0..COMPONENT_CODES.len(),
        0..TYPE_NAMES.len(),
        any::<u32>(),
        prop::collection::vec(0..NOISE.len(), 0..4),
    )
        .prop_map(|(buffer_view, byte_offset, component, element, count, noise)| AccessorCase {
            buffer_view,
            byte_offset,
            component,
            element,
            count,
            noise,
        })
}

fn document(views: &[BufferView], accessors: &[AccessorCase]) -> String {
    let views: Vec<String> = views
        .iter()
        .map(|view| {
            let mut json = format!(
                r#"{{"buffer":0,"byteLength":{},"byteOffset":{}"#,
                view.byte_length, view.byte_offset
            );
            if let Some(stride) = view.byte_stride {
                json.push_str(&format!(r#","byteStride":{}"#, stride));
            }
            json.push('}');
            json
        })
        .collect();
    let accessors: Vec<String> = accessors.iter().map(AccessorCase::to_json).collect();
    format!(
        r#"{{"asset":{{"version":"2.0"}},"accessors":[{}],"bufferViews":[{}],"buffers":[{{"byteLength":4096}}]}}"#,
        accessors.join(","),
        views.join(",")
    )
}

fn buffer_view() -> impl Strategy<Value = BufferView> {
    (0u32..2048, 0u32..2048, proptest::option::of(4u32..=252)).prop_map(
        |(byte_offset, byte_length, byte_stride)| BufferView {
            buffer: 0,
            byte_length,
            byte_offset,
            byte_stride,
            target: None,
        },
    )
}

proptest! {
    #[test]
    fn extracted_records_match(
        views in prop::collection::vec(buffer_view(), 1..6),
        seeds in prop::collection::vec(accessor_case(1), 0..12),
    ) {
        // Point every accessor at an existing view.
        let accessors: Vec<AccessorCase> = seeds
            .into_iter()
            .enumerate()
            .map(|(i, mut case)| {
                case.buffer_view = (i % views.len()) as u32;
                case
            })
            .collect();

        let json = document(&views, &accessors);
        let glb = write_container(json.as_bytes(), &[0; 4096]);
        let parsed = parse_glb(&glb).unwrap();

        prop_assert_eq!(parsed.document.accessor_count(), accessors.len());
        for (actual, case) in parsed.document.accessors.iter().zip(&accessors) {
            prop_assert_eq!(*actual, case.expected());
        }
        prop_assert_eq!(&parsed.document.buffer_views, &views);
    }
}
