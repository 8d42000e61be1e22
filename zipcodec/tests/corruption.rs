use zipcodec::header::{CentralHeader, DataDescriptor, EndOfCentralDirectory};
use zipcodec::{
    ExtractOptions, ExtractOutcome, MemorySource, WriterOptions, ZipArchive, ZipCompressionLevel,
    ZipEntry, ZipError, extract_to, read_entry,
};
use zipcodec::{ArchiveInput, write_archive_to_vec};

const FLAG_OFFSET_LOCAL: usize = 6;
const FLAG_OFFSET_CENTRAL: usize = 8;

/// Lay out one entry by hand: local header, data, `trailer`, central
/// directory and end record.
fn assemble(
    name: &str,
    data: &[u8],
    trailer: impl Fn(&CentralHeader) -> Vec<u8>,
) -> (Vec<u8>, usize) {
    let mut entry = ZipEntry::new();
    entry.set_name(name);
    entry.set_data(data.to_vec());
    let compressed = entry.get_compressed_data().unwrap();
    entry.set_offset(0);

    let mut out = entry.pack_local_header().unwrap();
    out.extend_from_slice(&compressed);
    out.extend_from_slice(&trailer(entry.header()));

    let cd_offset = out.len();
    let central = entry.pack_central_header().unwrap();
    out.extend_from_slice(&central);
    let end = EndOfCentralDirectory {
        disk_entries: 1,
        total_entries: 1,
        size: central.len() as u64,
        offset: cd_offset as u64,
        comment: Vec::new(),
        zip64: false,
    };
    out.extend_from_slice(&end.encode().unwrap());
    (out, cd_offset)
}

fn set_descriptor_flag(bytes: &mut [u8], cd_offset: usize) {
    bytes[FLAG_OFFSET_LOCAL] |= 0x08;
    bytes[cd_offset + FLAG_OFFSET_CENTRAL] |= 0x08;
}

fn descriptor_for(header: &CentralHeader) -> DataDescriptor {
    DataDescriptor {
        crc32: header.crc32,
        compressed_size: header.compressed_size as u32,
        size: header.size as u32,
    }
}

fn stored(name: &str, data: &[u8]) -> Vec<u8> {
    zipcodec::writer::write_archive_with(
        Vec::new(),
        vec![ArchiveInput::new(name, Box::new(MemorySource::new(data.to_vec())))],
        WriterOptions::default().with_level(ZipCompressionLevel::Store),
    )
    .unwrap()
}

#[test]
fn test_corrupted_central_signature() {
    let mut bytes = stored("a.txt", b"hello");
    let offset = ZipArchive::open(&bytes).unwrap().central_offsets()[0];
    bytes[offset as usize] ^= 0xFF;
    assert!(matches!(
        read_entry(&bytes, offset, None),
        Err(ZipError::InvalidCentralHeader { offset: o }) if o == offset
    ));
    assert!(ZipArchive::open(&bytes).is_err());
}

#[test]
fn test_corrupted_local_signature() {
    let mut bytes = stored("a.txt", b"hello");
    let offset = ZipArchive::open(&bytes).unwrap().central_offsets()[0];
    bytes[0] ^= 0xFF;
    assert!(matches!(
        read_entry(&bytes, offset, None),
        Err(ZipError::InvalidLocalHeader { offset: 0 })
    ));
}

#[test]
fn test_flipped_data_byte_is_bad_crc() {
    let mut bytes = stored("a.txt", b"hello world");
    let offset = ZipArchive::open(&bytes).unwrap().central_offsets()[0];
    // Local header is 30 bytes plus the 5-byte name.
    bytes[35] ^= 0x01;
    assert!(matches!(
        read_entry(&bytes, offset, None),
        Err(ZipError::BadCrc { .. })
    ));
}

#[test]
fn test_truncated_payload_is_bad_crc() {
    let mut bytes = stored("a.txt", b"hello");
    let offset = ZipArchive::open(&bytes).unwrap().central_offsets()[0] as usize;
    bytes[18..22].copy_from_slice(&0u32.to_le_bytes());
    bytes[offset + 20..offset + 24].copy_from_slice(&0u32.to_le_bytes());
    assert!(matches!(
        read_entry(&bytes, offset as u64, None),
        Err(ZipError::BadCrc { .. })
    ));

    let empty = stored("e.txt", b"");
    let offset = ZipArchive::open(&empty).unwrap().central_offsets()[0];
    assert!(read_entry(&empty, offset, None).unwrap().data.is_empty());
}

#[test]
fn test_unknown_method() {
    let mut bytes = stored("a.txt", b"hello");
    let offset = ZipArchive::open(&bytes).unwrap().central_offsets()[0] as usize;
    bytes[offset + 10..offset + 12].copy_from_slice(&99u16.to_le_bytes());
    assert!(matches!(
        read_entry(&bytes, offset as u64, None),
        Err(ZipError::UnknownCompressionMethod { method: 99 })
    ));
}

#[test]
fn test_zip64_marker_without_extra() {
    let mut bytes = stored("a.txt", b"hello");
    let offset = ZipArchive::open(&bytes).unwrap().central_offsets()[0] as usize;
    bytes[offset + 24..offset + 28].copy_from_slice(&u32::MAX.to_le_bytes());
    assert!(matches!(
        ZipArchive::open(&bytes),
        Err(ZipError::ExtraFieldParseError { .. })
    ));
}

#[test]
fn test_zip64_extra_resolves_marker() {
    let mut entry = ZipEntry::new();
    entry.set_name("z.txt");
    entry.set_data(b"zip64 sized".to_vec());
    let mut record = vec![0x01, 0x00, 0x08, 0x00];
    record.extend_from_slice(&11u64.to_le_bytes());
    entry.set_extra(record).unwrap();

    let compressed = entry.get_compressed_data().unwrap();
    entry.set_offset(0);
    let mut bytes = entry.pack_local_header().unwrap();
    bytes.extend_from_slice(&compressed);
    let cd_offset = bytes.len();
    bytes.extend_from_slice(&entry.pack_central_header().unwrap());
    bytes[cd_offset + 24..cd_offset + 28].copy_from_slice(&u32::MAX.to_le_bytes());

    let read = read_entry(&bytes, cd_offset as u64, None).unwrap();
    assert_eq!(read.data, b"zip64 sized");
}

#[test]
fn test_signed_descriptor() {
    let (mut bytes, cd) = assemble("d.txt", b"descriptor data", |h| {
        descriptor_for(h).encode().to_vec()
    });
    set_descriptor_flag(&mut bytes, cd);
    let read = read_entry(&bytes, cd as u64, None).unwrap();
    assert_eq!(read.data, b"descriptor data");
}

#[test]
fn test_unsigned_descriptor() {
    let (mut bytes, cd) = assemble("d.txt", b"descriptor data", |h| {
        descriptor_for(h).encode()[4..].to_vec()
    });
    set_descriptor_flag(&mut bytes, cd);
    let read = read_entry(&bytes, cd as u64, None).unwrap();
    assert_eq!(read.data, b"descriptor data");
}

#[test]
fn test_missing_descriptor() {
    let (mut bytes, cd) = assemble("d.txt", b"descriptor data", |_| Vec::new());
    set_descriptor_flag(&mut bytes, cd);
    assert!(matches!(
        read_entry(&bytes, cd as u64, None),
        Err(ZipError::DescriptorNotExist)
    ));
}

#[test]
fn test_unrecognized_descriptor() {
    let (mut bytes, cd) = assemble("d.txt", b"descriptor data", |_| vec![0x11; 16]);
    set_descriptor_flag(&mut bytes, cd);
    assert!(matches!(
        read_entry(&bytes, cd as u64, None),
        Err(ZipError::DescriptorUnknown)
    ));
}

#[test]
fn test_faulty_descriptor() {
    let (mut bytes, cd) = assemble("d.txt", b"descriptor data", |h| {
        let mut descriptor = descriptor_for(h);
        descriptor.crc32 ^= 1;
        descriptor.encode().to_vec()
    });
    set_descriptor_flag(&mut bytes, cd);
    assert!(matches!(
        read_entry(&bytes, cd as u64, None),
        Err(ZipError::DescriptorFaulty { .. })
    ));
}

#[test]
fn test_truncation_never_panics() {
    let bytes = write_archive_to_vec(vec![
        ArchiveInput::new("a.txt", Box::new(MemorySource::new(b"alpha ".repeat(40)))),
        ArchiveInput::directory("dir"),
        ArchiveInput::new("dir/b.txt", Box::new(MemorySource::new(b"beta".to_vec()))),
    ])
    .unwrap();
    let offsets = ZipArchive::open(&bytes).unwrap().central_offsets().to_vec();

    for cut in 0..bytes.len() {
        let truncated = &bytes[..cut];
        assert!(ZipArchive::open(truncated).is_err(), "cut at {cut}");
        for &offset in &offsets {
            let _ = read_entry(truncated, offset, None);
        }
    }
}

#[test]
fn test_hostile_names_stay_in_root() {
    let root = std::env::temp_dir().join(format!("zipcodec_hostile_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&root);

    for name in ["../../evil.txt", "/etc/evil.txt", "a/../../../evil.txt"] {
        let (bytes, cd) = assemble(name, b"payload", |_| Vec::new());
        let mut entry = ZipEntry::from_central(
            &bytes,
            cd as u64,
            std::sync::Arc::new(zipcodec::Utf8Decoder),
        )
        .unwrap();
        assert_eq!(entry.name(), name);

        let options = ExtractOptions {
            overwrite: true,
            ..ExtractOptions::default()
        };
        let outcome = extract_to(&root, &mut entry, &options).unwrap();
        let ExtractOutcome::File(path) = outcome else {
            panic!("expected a file for {name}");
        };
        assert!(path.starts_with(&root), "{} escaped", path.display());
    }

    std::fs::remove_dir_all(&root).unwrap();
}
