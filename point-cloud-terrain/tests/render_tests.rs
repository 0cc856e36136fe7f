/// Tests for plot rendering
use constants::render_settings::{COLOUR_BAR_LABEL_WIDTH, PLOT_SIZE};
use point_cloud_terrain::render::PlotKind;
use point_cloud_terrain::render::PlotRenderer;
use point_cloud_terrain::{GridAggregator, GridSpec, HeightField, Point, PointSet, Region};

/// Tilted plane with a band of empty cells
fn sample_field() -> HeightField {
    let grid = GridSpec::new(Region::default(), 0.05).unwrap();
    let xc = grid.x_centers();
    let yc = grid.y_centers();
    let mut points = Vec::new();
    for (i, &x) in xc.iter().enumerate() {
        for (j, &y) in yc.iter().enumerate() {
            if j == 5 {
                continue;
            }
            points.push(Point::new(x, y, x * 0.5 + y + (i % 3) as f64 * 0.01));
        }
    }
    let points = PointSet::from_points(grid.region, points);
    GridAggregator::new(grid).aggregate(points).unwrap()
}

#[test]
fn writes_every_plot() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("plots");
    let field = sample_field();

    let report = PlotRenderer::new(&out).render_all(&field);

    assert!(report.is_complete(), "failures: {:?}", report.failures);
    assert_eq!(report.written.len(), 3);
    for kind in PlotKind::ALL {
        let path = out.join(kind.file_name());
        let image = image::open(&path).unwrap();
        assert_eq!(image.width(), PLOT_SIZE);
        assert_eq!(image.height(), PLOT_SIZE);
    }
}

#[test]
fn surface_uses_more_than_background() {
    let dir = tempfile::tempdir().unwrap();
    let field = sample_field();

    let path = PlotRenderer::new(dir.path())
        .surface_from_mesh(&field.mesh())
        .unwrap();

    let image = image::open(&path).unwrap().to_rgb8();
    let coloured = image
        .pixels()
        .filter(|p| p.0 != [255, 255, 255] && p.0[0] != p.0[1])
        .count();
    assert!(coloured > 1_000, "expected coloured facets, found {coloured}");
}

/// Grey-level pixels dark enough to be text, right of the colour bar
fn label_column_ink(image: &image::RgbImage) -> usize {
    let start = PLOT_SIZE - COLOUR_BAR_LABEL_WIDTH + 14;
    (start..PLOT_SIZE)
        .flat_map(|x| (0..PLOT_SIZE).map(move |y| (x, y)))
        .filter(|&(x, y)| {
            let [r, g, b] = image.get_pixel(x, y).0;
            r == g && g == b && r < 128
        })
        .count()
}

#[test]
fn colour_bar_carries_tick_values() {
    let dir = tempfile::tempdir().unwrap();
    let field = sample_field();
    let renderer = PlotRenderer::new(dir.path());

    let with_bar = renderer.surface_from_mesh(&field.mesh()).unwrap();
    let without_bar = renderer.surface_from_field(&field.labeled()).unwrap();

    let ink = label_column_ink(&image::open(&with_bar).unwrap().to_rgb8());
    assert!(ink > 100, "expected tick labels, found {ink} dark pixels");
    assert_eq!(label_column_ink(&image::open(&without_bar).unwrap().to_rgb8()), 0);
}

#[test]
fn all_nan_field_still_renders() {
    let dir = tempfile::tempdir().unwrap();
    let grid = GridSpec::new(Region::default(), 0.1).unwrap();
    let field = GridAggregator::new(grid.clone())
        .aggregate(PointSet::new(grid.region))
        .unwrap();

    let report = PlotRenderer::new(dir.path()).render_all(&field);

    assert!(report.is_complete(), "failures: {:?}", report.failures);
    assert!(field.values().iter().all(|v| v.is_nan()));
}

#[test]
fn unwritable_directory_reports_each_plot() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"file").unwrap();
    let field = sample_field();
    let before: Vec<u64> = field.values().iter().map(|v| v.to_bits()).collect();

    let report = PlotRenderer::new(&blocker).render_all(&field);

    assert!(report.written.is_empty());
    let kinds: Vec<PlotKind> = report.failures.iter().map(|(kind, _)| *kind).collect();
    assert_eq!(kinds, PlotKind::ALL.to_vec());
    let after: Vec<u64> = field.values().iter().map(|v| v.to_bits()).collect();
    assert_eq!(before, after);
}

#[test]
fn custom_profile_offsets() {
    let dir = tempfile::tempdir().unwrap();
    let field = sample_field();

    let path = PlotRenderer::new(dir.path())
        .with_profile_offsets(vec![-0.2, 0.2])
        .profiles(&field.labeled(), field.grid().region.center_x())
        .unwrap();

    assert!(path.exists());
}
