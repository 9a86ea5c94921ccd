use umya_spreadsheet::*;

/// Writes `template.xlsx`, a monthly attendance template using every placeholder.
fn main() {
    let mut book = new_file();

    {
        let sheet = book.get_sheet_mut(&0).unwrap();
        sheet.set_name("Tabel");

        // Header block: rows 1-3, merged down by the [2:0] codes
        sheet.get_cell_mut("A1").set_value("&1№[2:0]");
        sheet.get_cell_mut("B1").set_value("F.A.A.[2:0]");
        sheet.get_cell_mut("C1").set_value("Tabel №[2:0]");
        sheet.get_cell_mut("D1").set_value("Wezipesi[2:0]");
        sheet.get_cell_mut("E1").set_value("{{month_name}} {{year}}");
        sheet.get_cell_mut("E2").set_value("Aýyň günleri");
        sheet.get_cell_mut("E3").set_value("{{days}}");

        // Summary headers, pushed right when the day columns are inserted
        sheet.get_cell_mut("F1").set_value("Iş saparlary[2:0]");
        sheet.get_cell_mut("G1").set_value("Rugsat[2:0]");
        sheet.get_cell_mut("H1").set_value("Sagat[2:0]");
        sheet.get_cell_mut("I1").set_value("Iş günleri[2:0]");

        // Template row for employees
        sheet.get_cell_mut("A4").set_value("{{start_process}}");

        // Summary placeholders below the employee block
        sheet.get_cell_mut("F5").set_value("{{w}}");
        sheet.get_cell_mut("G5").set_value("{{l}}{{a}}");
        sheet.get_cell_mut("H5").set_value("{{num_sum}}");
        sheet.get_cell_mut("I5").set_value("{{num_count}}&1");

        // Legend
        sheet.get_cell_mut("A7").set_value("Bellikler:");
        sheet.get_cell_mut("A8").set_value("{{marks_list}}");
        sheet.add_merge_cells("A8:D8");

        sheet
            .get_cell_mut("A10")
            .set_value("Iş wagty: {{working_time}} sagat, {{days_count}} gün");
    }

    let path = "template.xlsx";
    writer::xlsx::write(&book, path).expect("Failed to write template.xlsx");
    println!("Created {} successfully!", path);
    println!("Try: sheetfill {} --fake 5 --seed 1 -v", path);
}
