use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use instant::Instant;

use chunkview::render::recording::RecordingSurface;
use chunkview::{
    Dimension, InputEvent, Map, MapCallbacks, MapOptions, PointerCoord, ScreenPoint, Spot,
    TileFetcher,
};

/// In-memory tile service so the demo runs without a backend
struct CannedTiles;

impl TileFetcher for CannedTiles {
    fn fetch(&self, url: &str) -> chunkview::Result<Vec<u8>> {
        if url.ends_with("chunk_range.json") {
            return Ok(b"[-4, -4, 8, 8]".to_vec());
        }
        let raster = image::RgbaImage::from_pixel(512, 512, image::Rgba([96, 128, 72, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(raster)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)?;
        Ok(bytes)
    }
}

/// Example of driving the engine headless, without any UI framework
fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("chunkview headless demo");
    println!("=======================");

    let spots = vec![
        Spot {
            id: 1,
            kind: 2,
            x: 0.0,
            z: 0.0,
            name: "Central Station".to_string(),
            hira: Some("ちゅうおうえき".to_string()),
            color: Some("#d0a000".to_string()),
            detail: Some("main line interchange".to_string()),
            image: None,
        },
        Spot {
            id: 2,
            kind: 1,
            x: 900.0,
            z: -350.0,
            name: "North Ridge".to_string(),
            hira: None,
            color: None,
            detail: None,
            image: None,
        },
    ];

    let selections = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&selections);

    let mut map = Map::new();
    map.bind(MapOptions {
        dimension: Dimension::Overworld,
        tile_prefix: "/map".to_string(),
        spots,
        size: ScreenPoint::new(1280.0, 720.0),
        callbacks: MapCallbacks {
            on_select_spot: Some(Box::new(move |spot| {
                log.borrow_mut().push(spot.map(|s| s.name.clone()));
            })),
            on_scale_change: Some(Box::new(|scale| println!("  scale -> {:.2}", scale))),
            ..Default::default()
        },
        fetcher: Some(Arc::new(CannedTiles)),
        ..Default::default()
    })
    .map_err(|e| anyhow::anyhow!("{e}"))?;

    // Run the frame loop for a simulated second
    let mut surface = RecordingSurface::new();
    let t0 = Instant::now();
    let mut now = t0;
    let mut run = |map: &mut Map, now: &mut Instant, frames: u32| {
        for _ in 0..frames {
            *now += Duration::from_millis(16);
            map.tick(*now, &mut surface);
        }
        std::thread::sleep(Duration::from_millis(50));
    };
    run(&mut map, &mut now, 30);

    println!("state after bind: {:?}", map.state());
    println!(
        "viewport: offset=({:.0}, {:.0}) scale={}",
        map.viewport().offset().x,
        map.viewport().offset().z,
        map.viewport().scale()
    );

    println!("\nzooming in:");
    map.zoom_in(now);
    run(&mut map, &mut now, 40);

    println!("\ndragging east:");
    map.handle_event(
        InputEvent::PointerDown {
            position: PointerCoord::new(640.0, 360.0),
        },
        now,
    );
    map.handle_event(
        InputEvent::PointerMove {
            position: PointerCoord::new(400.0, 360.0),
        },
        now,
    );
    map.handle_event(InputEvent::PointerUp, now);
    run(&mut map, &mut now, 5);
    let center = map.viewport().center();
    println!("  center now ({:.0}, {:.0})", center.x, center.z);

    println!("\nfocusing the station:");
    map.focus_point(0, now).map_err(|e| anyhow::anyhow!("{e}"))?;
    run(&mut map, &mut now, 50);
    println!(
        "  pin at ({:.0}, {:.0}), visible={}",
        map.pin().position().x,
        map.pin().position().z,
        map.pin().is_visible()
    );
    println!("  selections seen: {:?}", selections.borrow());

    println!("\nfocusing an arbitrary coordinate:");
    map.focus_position(PointerCoord::new(100.0, 100.0), now);
    run(&mut map, &mut now, 50);
    let pin = map.pin().position();
    println!("  pin moved to ({:.0}, {:.0})", pin.x, pin.z);

    let stats = map.stats();
    println!("\nframes drawn={} idle={}", stats.drawn, stats.idle);
    println!(
        "tiles cached: {}",
        map.tile_cache().map(|c| c.len()).unwrap_or(0)
    );

    map.unbind();
    println!("\ndone");
    Ok(())
}
