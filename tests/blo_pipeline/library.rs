//! Several containers held in a bounded library.

use blo_rs::prelude::*;

use crate::sprite_bytes;

fn container(prefix: &str, sprites: usize) -> Vec<u8> {
	let mut builder = BloFileBuilder::new(2);
	for i in 0..sprites {
		builder.push(format!("{prefix}_{i}.cfs"), sprite_bytes(4, 4, (1, 1), &[vec![1; 16]]));
	}
	builder.push(format!("{prefix}.wav"), b"RIFF".to_vec());
	builder.build()
}

#[test_log::test]
fn test_library_keeps_most_recent() {
	let mut library = Library::new(LibraryConfig {
		max_loaded: 3,
	});
	let mut evicted = Vec::new();
	for name in ["walls", "floors", "men", "tanks", "sfx"] {
		evicted.extend(library.load(format!("{name}.blo"), container(name, 2)).unwrap());
	}

	assert_eq!(evicted, vec!["walls.blo", "floors.blo"]);
	let names: Vec<_> = library.archives().map(Archive::name).collect();
	assert_eq!(names, vec!["sfx.blo", "tanks.blo", "men.blo"]);
	assert_eq!(library.status(), "3/3 files in memory");
	assert_eq!(library.sprites().count(), 6);
	assert_eq!(library.get("sfx.blo").unwrap().category(), Category::Sounds);
}

#[test]
fn test_library_search_spans_archives() {
	let mut library = Library::new(LibraryConfig::default());
	library.load("men.blo", container("Walk", 2)).unwrap();
	library.load("tanks.blo", container("tank", 1)).unwrap();

	let results = library.search("WALK");
	assert_eq!(results.sprites.len(), 2);
	assert_eq!(results.audio.len(), 1);
	assert!(results.sprites.iter().all(|(archive, _)| *archive == "men.blo"));
	assert_eq!(library.search("_0.cfs").sprites.len(), 2);
}

#[test]
fn test_invalid_containers_are_rejected() {
	let mut library = Library::new(LibraryConfig::default());
	assert!(matches!(
		library.load("v3.blo", vec![3, 0, 0, 0, 1, 0, 0, 0]),
		Err(BloFileError::UnsupportedContainerVersion(3))
	));
	assert!(matches!(
		library.load("empty.blo", vec![1, 0, 0, 0, 0, 0, 0, 0]),
		Err(BloFileError::InvalidEntryCount(0))
	));
	assert!(library.is_empty());
}
